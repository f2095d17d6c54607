use crate::models::{BroadType, DirectoryEntry, EquityCategory, SubRegion};

const NAVI_MUMBAI: [&str; 8] = [
    "vashi", "nerul", "kharghar", "belapur", "kopar khairane", "ghansoli", "airoli", "navi mumbai",
];
const THANE_MMR: [&str; 2] = ["thane", "mmr"];
const WEST: [&str; 13] = [
    "andheri west", "vile parle west", "bandra west", "kandivali west", "borivali west",
    "malad west", "santacruz west", "juhu", "worli", "prabhadevi", "mahalaxmi", "bandra east", "khar",
];
/// Addresses that mention a west keyword but sit east of the line
const EAST_OVERRIDES: [&str; 5] = ["andheri east", "goregaon east", "powai", "vidyavihar", "ghatkopar"];
const EAST: [&str; 10] = [
    "andheri east", "goregaon east", "powai", "vidyavihar", "ghatkopar", "mulund",
    "kanjurmarg", "vikhroli", "marol", "seepz",
];
const SOUTH: [&str; 10] = [
    "fort", "churchgate", "nariman point", "lower parel", "byculla", "cuffe parade",
    "marine lines", "worli", "mahalaxmi", "colaba",
];
const CENTRAL: [&str; 5] = ["matunga", "dadar", "parel", "wadala", "sion"];

const PUBLIC_MARKERS: [&str; 9] = ["govt", "moe", "msme", "niti", "iit", "iim", "vjti", "ict", "academic"];
const ZERO_EQUITY_MARKERS: [&str; 2] = ["nil", "zero"];

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Place a Mumbai address in its sub-region by keyword
///
/// Navi Mumbai and Thane are checked first so that "kharghar" and "thane"
/// are not swallowed by the broader west and east keyword lists.
pub fn sub_region(address: &str) -> SubRegion {
    let address = address.to_lowercase();

    if mentions_any(&address, &NAVI_MUMBAI) {
        return SubRegion::Navi;
    }
    if mentions_any(&address, &THANE_MMR) {
        return SubRegion::ThaneMmr;
    }
    if mentions_any(&address, &WEST) {
        if mentions_any(&address, &EAST_OVERRIDES) {
            return SubRegion::East;
        }
        return SubRegion::West;
    }
    if mentions_any(&address, &EAST) {
        return SubRegion::East;
    }
    if mentions_any(&address, &SOUTH) {
        return SubRegion::South;
    }
    if mentions_any(&address, &CENTRAL) {
        return SubRegion::Central;
    }

    // Bare neighbourhood names without a west/east suffix
    if address.contains("andheri") {
        return if address.contains("west") { SubRegion::West } else { SubRegion::East };
    }
    if address.contains("goregaon") {
        return if address.contains("east") { SubRegion::East } else { SubRegion::West };
    }
    if address.contains("bkc") || address.contains("bandra kurla") {
        return SubRegion::West;
    }

    SubRegion::Other
}

pub fn broad_type(provider_type: &str) -> BroadType {
    if mentions_any(&provider_type.to_lowercase(), &PUBLIC_MARKERS) {
        BroadType::GovernmentAcademic
    } else {
        BroadType::Private
    }
}

pub fn equity_category(equity: &str) -> EquityCategory {
    let equity = equity.to_lowercase();
    // "0%" only as a standalone value, so "10%" and "0–2%" still count as equity
    let zero_percent = equity
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == ',')
        .any(|token| token == "0%");

    if zero_percent || mentions_any(&equity, &ZERO_EQUITY_MARKERS) {
        EquityCategory::ZeroEquity
    } else {
        EquityCategory::EquityTaken
    }
}

/// Lowercase id with runs of non-alphanumerics collapsed to '-'
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Fill in the derived fields of a raw directory listing
pub fn classify_entry(mut entry: DirectoryEntry) -> DirectoryEntry {
    if entry.id.trim().is_empty() {
        entry.id = slugify(&entry.name);
    }
    entry.sub_region = sub_region(&entry.area);
    entry.broad_type = broad_type(&entry.kind);
    entry.equity_category = equity_category(&entry.equity_taken);
    entry
}
