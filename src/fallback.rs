use crate::pitch::extract::{self, ExtractError};
use crate::pitch::Section;

/// Pre-written pitch in the same keyed-JSON shape the model is asked for.
/// `{{company}}` is filled in after extraction.
pub const FALLBACK_PITCH: &str = include_str!("../data/fallback_pitch.json");

const COMPANY_PLACEHOLDER: &str = "{{company}}";

fn company_or_default(company: &str) -> &str {
    match company.trim() {
        "" => "your company",
        name => name,
    }
}

/// The fallback pitch, run through the same extractor as live output.
pub fn fallback_sections(company: &str) -> Result<[Section; 4], ExtractError> {
    let company = company_or_default(company);
    let mut sections = extract::extract(FALLBACK_PITCH)?;
    for section in &mut sections {
        section.title = section.title.replace(COMPANY_PLACEHOLDER, company);
        section.content = section.content.replace(COMPANY_PLACEHOLDER, company);
    }
    Ok(sections)
}

/// Last-resort content built in code. Never fails.
pub fn emergency_sections(company: &str) -> [Section; 4] {
    let company = company_or_default(company);
    [
        Section::new(
            "Your Forecasts Are Guessing",
            format!(
                "In today's market, volatility isn't a temporary disruption; it's the new climate. \
                 {company} is striving to **share a realistic and feasible vision of future turnover** \
                 in a world of shifting consumer behavior.\n\n\
                 Relying on old tools for this is like navigating a storm with a paper map. \
                 You need to stop reacting and start anticipating."
            ),
        ),
        Section::new(
            "From Chaos to Clarity",
            "We don't sell software; we deliver a competitive advantage designed for a **VUCA world**. \
             Our **BLOOM DEMAND PLANNING** module was built to turn complexity into a strength.\n\n\
             It's not about more spreadsheets. It's about intelligence.\n\n\
             • Leverage **Forecast at Scale technology** to turn internal and external data into accurate, responsive demand plans.\n\
             • Benefit from **advanced algorithms, event detection, and exception management** to see the future with clarity.",
        ),
        Section::new(
            "How The World Leader Leads",
            "This isn't theory. This is how the **#1 cosmetics group worldwide**, L'Oréal, navigates volatility. \
             For **over 20 years**, they have trusted FuturMaster as their core Demand Planning solution.\n\n\
             Today the platform is deployed in **80 countries**, supporting **3,250 users**. \
             The best in the world don't settle for second-best tools.",
        ),
        Section::new(
            "Researcher or Market Leader?",
            "Some competitors, like **o9 Solutions**, will offer you a \"Digital Brain\" that you must spend years \
             \"training\" with a team of data scientists. It's an **expensive academic research project**, not a solution.\n\n\
             Your time should be spent **winning the market, not experimenting in an academic sandbox**.\n\n\
             > The choice is simple: do you want to be a platform researcher or a market leader?",
        ),
    ]
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_extracts_four_sections() {
        let sections = fallback_sections("Danone").unwrap();
        assert_eq!(sections[0].display_title(), "You're Not Just Making Products. You're Keeping a Promise.");
        assert!(sections[0].content.starts_with("Danone isn't just a brand"));
        assert!(sections[2].content.contains("greatest strength of Danone"));
        assert!(sections.iter().all(|s| !s.content.contains(COMPANY_PLACEHOLDER)));
    }

    #[test]
    fn blank_company_gets_generic_name() {
        let sections = fallback_sections("  ").unwrap();
        assert!(sections[0].content.starts_with("your company isn't just"));
        let emergency = emergency_sections("");
        assert!(emergency[0].content.contains("your company is striving"));
    }

    #[test]
    fn emergency_names_company() {
        let sections = emergency_sections("Nestlé");
        assert_eq!(sections.len(), 4);
        assert!(sections[0].content.contains("Nestlé is striving"));
        assert!(sections.iter().all(|s| !s.title.is_empty() && !s.content.is_empty()));
    }
}
