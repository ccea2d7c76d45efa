use serde::{Deserialize, Serialize};
use std::fmt;

/// The two app populations being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Covid,
    NonCovid,
}

impl Group {
    /// Display order used by every chart and report.
    pub const ALL: [Group; 2] = [Group::Covid, Group::NonCovid];

    pub fn label(self) -> &'static str {
        match self {
            Group::Covid => "COVID",
            Group::NonCovid => "non-COVID",
        }
    }

    /// Suffix used in figure file names.
    pub fn slug(self) -> &'static str {
        match self {
            Group::Covid => "covid",
            Group::NonCovid => "non_covid",
        }
    }

    pub fn is_covid(self) -> bool {
        matches!(self, Group::Covid)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerGroup<T> {
    pub covid: T,
    pub non_covid: T,
}

impl<T> PerGroup<T> {
    pub fn new(covid: T, non_covid: T) -> Self {
        Self { covid, non_covid }
    }

    pub fn get(&self, group: Group) -> &T {
        match group {
            Group::Covid => &self.covid,
            Group::NonCovid => &self.non_covid,
        }
    }

    pub fn get_mut(&mut self, group: Group) -> &mut T {
        match group {
            Group::Covid => &mut self.covid,
            Group::NonCovid => &mut self.non_covid,
        }
    }

    pub fn map<U, F>(&self, mut f: F) -> PerGroup<U>
    where
        F: FnMut(Group, &T) -> U,
    {
        PerGroup {
            covid: f(Group::Covid, &self.covid),
            non_covid: f(Group::NonCovid, &self.non_covid),
        }
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Group, &T)> {
        Group::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

impl PerGroup<Vec<f64>> {
    /// Split a column of optional values by group, dropping missing cells.
    pub fn collect<'a, I, A, F>(rows: I, mut value: F) -> Self
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a + Grouped,
        F: FnMut(&A) -> Option<f64>,
    {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            if let Some(v) = value(row) {
                acc.get_mut(row.group()).push(v);
            }
            acc
        })
    }
}

/// Anything that belongs to one of the two groups.
pub trait Grouped {
    fn group(&self) -> Group;
}
