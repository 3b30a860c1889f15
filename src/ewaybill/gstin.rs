//! State → GSTIN registration table.
//!
//! The company holds one GST registration per state; the bill-to GSTIN is
//! resolved from the state named in the importer address. The table is built
//! once at startup and injected into the transformer, so tests can substitute
//! their own entries.

use std::collections::HashMap;

/// Registrations held by the company, keyed by state name as it appears in
/// importer addresses.
const REGISTRATIONS: [(&str, &str); 26] = [
    ("Gujarat", "24AAACS0764L1ZC"),
    ("Haryana", "06AAACS0764L1ZA"),
    ("Tamil Nadu", "33AAACS0764L1ZD"),
    ("Karnataka", "29AAACS0764L1Z2"),
    ("Maharashtra", "27AAACS0764L1Z6"),
    ("Delhi", "07AAACS0764L1Z8"),
    ("West Bengal", "19AAACS0764L1Z3"),
    ("Madhya Pradesh", "23AAACS0764L1ZE"),
    ("Uttar Pradesh", "09AAACS0764L1Z4"),
    ("Goa", "30AAACS0764L1ZJ"),
    ("Puducherry", "34AAACS0764L1ZB"),
    ("Chandigarh", "04AAACS0764L1ZE"),
    ("Telangana", "36AAACS0764L1Z7"),
    ("Chhattisgarh", "22AAACS0764L1ZG"),
    ("Jammu & Kashmir", "01AAACS0764L1ZK"),
    ("Himachal Pradesh", "02AAACS0764L1ZI"),
    ("Punjab", "03AAACS0764L1ZG"),
    ("Uttarakhand", "05AAACS0764L1ZC"),
    ("Rajasthan", "08AAACS0764L1Z6"),
    ("Bihar", "10AAACS0764L1ZL"),
    ("Assam", "18AAACS0764L1Z5"),
    ("Jharkhand", "20AAACS0764L1ZK"),
    ("Odisha", "21AAACS0764L1ZI"),
    ("Andhra Pradesh (New)", "37AAACS0764L1Z5"),
    ("Kerala", "32AAACS0764L1ZF"),
    ("Meghalaya", "17AAACS0764L1Z7"),
];

/// Immutable state-name → GSTIN mapping.
#[derive(Debug, Clone)]
pub struct GstinTable {
    entries: HashMap<String, String>,
}

impl GstinTable {
    /// The company's registration table.
    pub fn builtin() -> Self {
        Self::from_entries(REGISTRATIONS.iter().map(|(s, g)| (*s, *g)))
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(state, gstin)| (state.to_string(), gstin.to_string()))
                .collect(),
        }
    }

    /// GSTIN for a state name; unknown states resolve to an empty string.
    pub fn lookup(&self, state: &str) -> &str {
        self.entries.get(state).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
