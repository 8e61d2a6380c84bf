//! Label legend for the active domain.

use entity_overlay::{ColorTable, Domain};
use serde::{Deserialize, Serialize};

/// One label and its display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    pub domain: String,
    pub entries: Vec<LegendEntry>,
    /// Color for labels not listed
    pub fallback: String,
}

pub fn legend_for_table(domain: Domain, table: &ColorTable) -> Legend {
    Legend {
        domain: domain.name().to_string(),
        entries: table
            .iter()
            .map(|(label, color)| LegendEntry {
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect(),
        fallback: table.fallback_color().to_string(),
    }
}

pub fn legend(domain: Domain) -> Legend {
    legend_for_table(domain, domain.color_table())
}
