//! Shinkansen service type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a service type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service type: {0}")]
pub struct InvalidServiceType(pub String);

/// The kind of Shinkansen service a report refers to.
///
/// On the wire each variant is written with its romanised name (`"nozomi"`)
/// and read back from either that name or the Japanese label. For display
/// and for building train names the Japanese label is used.
///
/// # Examples
///
/// ```
/// use delay_server::domain::ServiceType;
///
/// let kind: ServiceType = "hikari".parse().unwrap();
/// assert_eq!(kind.label(), "ひかり");
/// assert_eq!(kind.train_name("501"), "ひかり501");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ServiceType {
    Nozomi,
    Hikari,
    Kodama,
}

impl ServiceType {
    /// Every service type, in the order they are offered to users.
    pub const ALL: [ServiceType; 3] = [ServiceType::Nozomi, ServiceType::Hikari, ServiceType::Kodama];

    /// Romanised identifier used in forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Nozomi => "nozomi",
            ServiceType::Hikari => "hikari",
            ServiceType::Kodama => "kodama",
        }
    }

    /// Japanese display label.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Nozomi => "のぞみ",
            ServiceType::Hikari => "ひかり",
            ServiceType::Kodama => "こだま",
        }
    }

    /// Timetable key for this service type and a train number.
    ///
    /// The label and number are concatenated with no separator.
    pub fn train_name(&self, number: &str) -> String {
        format!("{}{}", self.label(), number)
    }
}

impl FromStr for ServiceType {
    type Err = InvalidServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.label() == s)
            .ok_or_else(|| InvalidServiceType(s.to_string()))
    }
}

impl TryFrom<String> for ServiceType {
    type Error = InvalidServiceType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
