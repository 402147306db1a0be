//! The fixed benchmark dataset.
//!
//! Ten hand-authored synthetic leads spanning high-value, low-fit, ambiguous
//! and edge cases, each annotated with an expected-score tolerance band. The
//! set is deliberately static so accuracy figures are comparable run over
//! run; a lead's 0-based position is the stable join key to its annotation.

use leadscope_core::{LeadAttributes, LeadProfile};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One entry of the benchmark dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkLead {
    /// Stable 0-based position in the dataset.
    pub index: usize,
    /// The synthetic lead to qualify.
    pub profile: LeadProfile,
}

/// Expected-score tolerance band for one dataset index.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectedRange {
    /// Inclusive lower bound, in [0, 100].
    pub min: f64,
    /// Inclusive upper bound, in [0, 100].
    pub max: f64,
    /// Why this band was chosen.
    pub rationale: &'static str,
}

fn attrs(
    company_size: &str,
    industry: &str,
    budget: &str,
    decision_maker: &str,
    pain_points: &[&str],
    timeline: &str,
) -> LeadAttributes {
    LeadAttributes {
        company_size: Some(company_size.to_string()),
        industry: Some(industry.to_string()),
        budget: Some(budget.to_string()),
        decision_maker: Some(decision_maker.to_string()),
        pain_points: pain_points.iter().map(|p| p.to_string()).collect(),
        timeline: Some(timeline.to_string()),
    }
}

fn lead(name: &str, email: &str, company: &str, notes: &str, attributes: Option<LeadAttributes>) -> LeadProfile {
    LeadProfile {
        name: name.to_string(),
        email: email.to_string(),
        company: company.to_string(),
        notes: Some(notes.to_string()),
        attributes,
    }
}

static DATASET: Lazy<Vec<BenchmarkLead>> = Lazy::new(|| {
    let profiles = vec![
        // High-value enterprise lead
        lead(
            "Robert Chen",
            "rchen@fortune500.com",
            "Fortune500 Corp",
            "Enterprise client, actively seeking AI solutions, budget approved",
            Some(attrs(
                "5000+",
                "Technology",
                "Very High",
                "CTO",
                &["scaling infrastructure", "data management"],
                "Q1 2025",
            )),
        ),
        // Low-fit startup
        lead(
            "Jessica Martinez",
            "jessica@tinystartup.io",
            "TinyStartup",
            "Early stage, bootstrapped, no budget yet",
            Some(attrs(
                "5-10",
                "SaaS",
                "None",
                "Founder",
                &["finding product-market fit"],
                "unknown",
            )),
        ),
        // Ambiguous mid-market lead
        lead(
            "Michael Thompson",
            "mthompson@midmarket.com",
            "MidMarket Solutions",
            "Growing company, evaluating options",
            Some(attrs(
                "200-500",
                "Professional Services",
                "Medium",
                "Director of Operations",
                &["process automation"],
                "Q2 2025",
            )),
        ),
        // High-value finance sector
        lead(
            "Sarah Williams",
            "swilliams@financebank.com",
            "FinanceBank International",
            "Large financial institution, compliance-focused, strong budget signals",
            Some(attrs(
                "2000+",
                "Finance",
                "Very High",
                "VP of Technology",
                &["regulatory compliance", "risk management"],
                "Q1 2025",
            )),
        ),
        // Low-fit non-tech industry
        lead(
            "David Rodriguez",
            "drodriguez@retailco.com",
            "RetailCo Stores",
            "Traditional retail, limited tech adoption",
            Some(attrs(
                "100-200",
                "Retail",
                "Low",
                "Store Manager",
                &["inventory management"],
                "unknown",
            )),
        ),
        // High-value healthcare
        lead(
            "Emily Johnson",
            "ejohnson@healthsystems.com",
            "HealthSystems Medical",
            "Healthcare provider, HIPAA compliance required, enterprise deal",
            Some(attrs(
                "1000+",
                "Healthcare",
                "High",
                "CIO",
                &["patient data security", "interoperability"],
                "Q2 2025",
            )),
        ),
        // Ambiguous manufacturing
        lead(
            "James Anderson",
            "janderson@manufacturing.com",
            "Manufacturing Inc",
            "Industrial company, exploring digital transformation",
            Some(attrs(
                "500-1000",
                "Manufacturing",
                "Medium-High",
                "VP of Engineering",
                &["supply chain optimization", "IoT integration"],
                "Q3 2025",
            )),
        ),
        // High-value tech startup (unicorn)
        lead(
            "Alex Kim",
            "akim@unicornstartup.com",
            "UnicornStartup",
            "Well-funded startup, Series B, aggressive growth plans",
            Some(attrs(
                "500-1000",
                "Technology",
                "Very High",
                "VP Product",
                &["scaling team", "product velocity"],
                "immediate",
            )),
        ),
        // Low-fit individual consultant
        lead(
            "Patricia Brown",
            "pbrown@consulting.com",
            "Brown Consulting",
            "Solo consultant, minimal needs",
            Some(attrs(
                "1",
                "Consulting",
                "Very Low",
                "Owner",
                &["client management"],
                "unknown",
            )),
        ),
        // Edge case: no structured attributes
        lead(
            "Chris Taylor",
            "ctaylor@mystery.com",
            "Mystery Corp",
            "Limited information available",
            None,
        ),
    ];

    profiles
        .into_iter()
        .enumerate()
        .map(|(index, profile)| BenchmarkLead { index, profile })
        .collect()
});

static EXPECTED_RANGES: Lazy<Vec<ExpectedRange>> = Lazy::new(|| {
    vec![
        ExpectedRange { min: 85.0, max: 100.0, rationale: "High-value enterprise lead" },
        ExpectedRange { min: 0.0, max: 30.0, rationale: "Low-fit startup with no budget" },
        ExpectedRange { min: 40.0, max: 70.0, rationale: "Ambiguous mid-market lead" },
        ExpectedRange { min: 80.0, max: 95.0, rationale: "High-value finance sector" },
        ExpectedRange { min: 20.0, max: 40.0, rationale: "Low-fit traditional retail" },
        ExpectedRange { min: 75.0, max: 90.0, rationale: "High-value healthcare" },
        ExpectedRange { min: 50.0, max: 75.0, rationale: "Ambiguous manufacturing" },
        ExpectedRange { min: 85.0, max: 100.0, rationale: "High-value well-funded startup" },
        ExpectedRange { min: 0.0, max: 25.0, rationale: "Low-fit solo consultant" },
        ExpectedRange { min: 30.0, max: 60.0, rationale: "Edge case with missing data" },
    ]
});

/// The full ordered benchmark dataset.
pub fn dataset() -> &'static [BenchmarkLead] {
    &DATASET
}

/// The expected-score band for a dataset index, or `None` when the index is
/// out of bounds.
pub fn expected_range(index: usize) -> Option<&'static ExpectedRange> {
    EXPECTED_RANGES.get(index)
}
