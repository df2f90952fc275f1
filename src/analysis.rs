// analysis.rs
use crate::domain::Listing;
use std::collections::BTreeMap;

/// Which listing column the user is searching in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    City,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    City,
    Category,
}

impl Column {
    pub fn value(self, listing: &Listing) -> &str {
        match self {
            Column::City => &listing.city,
            Column::Category => &listing.category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::City => "Kota",
            Column::Category => "Kategori",
        }
    }
}

impl SearchMode {
    /// Parse the `mode` query parameter. Anything unrecognised is city search.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("category") | Some("kategori") => SearchMode::Category,
            _ => SearchMode::City,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SearchMode::City => "city",
            SearchMode::Category => "category",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchMode::City => "Kota/Kabupaten",
            SearchMode::Category => "Kategori Makanan",
        }
    }

    /// Column the query is matched against.
    pub fn target(self) -> Column {
        match self {
            SearchMode::City => Column::City,
            SearchMode::Category => Column::Category,
        }
    }

    /// Column the filtered rows are grouped by: the other one.
    pub fn group_by(self) -> Column {
        match self {
            SearchMode::City => Column::Category,
            SearchMode::Category => Column::City,
        }
    }
}

/// Rows whose `column` contains `query`, ignoring case.
/// A blank query keeps every row.
pub fn filter_listings<'a>(listings: &'a [Listing], column: Column, query: &str) -> Vec<&'a Listing> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return listings.iter().collect();
    }

    listings
        .iter()
        .filter(|l| column.value(l).to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub group: String,
    pub count: usize,
    /// Mean over the rows that have a rating; `None` if none do.
    pub mean_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// Ordered by count descending, then group name.
    groups: Vec<GroupStats>,
    total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    NoData,
    Data(Aggregates),
}

impl Summary {
    pub fn aggregates(&self) -> Option<&Aggregates> {
        match self {
            Summary::NoData => None,
            Summary::Data(a) => Some(a),
        }
    }
}

impl Aggregates {
    pub fn groups(&self) -> &[GroupStats] {
        &self.groups
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.groups.iter().map(|g| (g.group.as_str(), g.count)).collect()
    }

    pub fn mean_ratings(&self) -> Vec<(&str, Option<f64>)> {
        self.groups
            .iter()
            .map(|g| (g.group.as_str(), g.mean_rating))
            .collect()
    }

    pub fn count_of(&self, group: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.group == group).map(|g| g.count)
    }

    pub fn mean_rating_of(&self, group: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.group == group)
            .and_then(|g| g.mean_rating)
    }

    /// Most frequent group ("Kompetitor Dominan").
    pub fn dominant(&self) -> &GroupStats {
        &self.groups[0]
    }

    /// Least frequent group ("Peluang Emas").
    pub fn opportunity(&self) -> &GroupStats {
        &self.groups[self.groups.len() - 1]
    }

    /// Group with the best mean rating, if any group was rated at all.
    pub fn top_rated(&self) -> Option<&GroupStats> {
        self.groups
            .iter()
            .filter(|g| g.mean_rating.is_some())
            .fold(None, |best: Option<&GroupStats>, g| match best {
                Some(b) if b.mean_rating >= g.mean_rating => Some(b),
                _ => Some(g),
            })
    }
}

/// Count and mean rating per distinct value of `group_by`.
pub fn summarize(rows: &[&Listing], group_by: Column) -> Summary {
    if rows.is_empty() {
        return Summary::NoData;
    }

    // group -> (count, rating sum, rated rows)
    let mut acc: BTreeMap<&str, (usize, f64, usize)> = BTreeMap::new();
    for listing in rows {
        let entry = acc.entry(group_by.value(listing)).or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(r) = listing.rating {
            entry.1 += r;
            entry.2 += 1;
        }
    }

    let mut groups: Vec<GroupStats> = acc
        .into_iter()
        .map(|(group, (count, sum, rated))| GroupStats {
            group: group.to_string(),
            count,
            mean_rating: (rated > 0).then(|| sum / rated as f64),
        })
        .collect();

    // BTreeMap already yields names ascending; a stable sort keeps that for ties.
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    Summary::Data(Aggregates {
        groups,
        total: rows.len(),
    })
}
