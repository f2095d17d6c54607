use crate::catalog::Catalog;
use crate::core::Matcher;
use crate::models::{ChatMessage, ChatRole, DirectoryEntry, MatchResult, Profile, Resource};
use regex::Regex;
use std::sync::LazyLock;

/// Markdown bold spans, rewritten as HTML for the directory bot widget
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

pub const RATE_LIMITED_REPLY: &str = "The AI advisor is temporarily rate-limited. Please wait about 30 seconds and try again.\n\nIn the meantime, browse resources on the **Explore** page.";

pub const DIRECTORY_UNAVAILABLE_REPLY: &str = "⚠️ **Directory Advisor Unavailable**: Something went wrong while contacting the AI. Please try again.";

pub const TIMED_OUT_REPLY: &str = "⚠️ **AI Request Timed Out**: The model is taking too long to respond.";

const ADVISOR_RULES: &str = "RULES:
- Give specific, actionable advice referencing resources above
- Explain WHY each resource matches the founder's profile
- Include eligibility and next steps
- Use **bold** headings and bullet points
- Be concise but helpful
- If unsure, say so and suggest where to find info";

const DIRECTORY_RULES: &str = "You are a Local Directory AI Advisor. Your ONLY job is to answer questions using the exact directory listings below. DO NOT use outside knowledge. DO NOT hallucinate. Keep responses conversational, concise, and highly relevant. If they ask about a location, recommend spaces in that SPECIFIC location from the list. Use markdown to bold names.";

const HELP_MENU: &str = "I can help you with:

- **Grants & Schemes** — Government funding programs
- **Incubators & Accelerators** — Programs to boost your startup
- **Investors** — Angels, VCs, and funding platforms
- **Next Steps** — What to do at your current stage

Try asking something like \"Which grants am I eligible for?\" or \"Best incubators for FinTech startups.\"";

/// How much of the catalog goes into the advisor prompt
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    /// Resources per category when a profile is available
    pub per_category: usize,
    /// Hard cap on the dataset section, in characters
    pub max_chars: usize,
}

fn joined(values: &[String], sep: &str) -> String {
    values.join(sep)
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn grant_line(g: &Resource) -> String {
    format!("{}: {}, {}", g.name, or_na(&g.funding), joined(&g.stages, "/"))
}

fn incubator_line(i: &Resource) -> String {
    format!(
        "{} ({}): {}, {}",
        i.name,
        i.region(),
        or_na(&i.kind),
        joined(&i.stages, "/")
    )
}

fn investor_line(i: &Resource) -> String {
    let sectors: Vec<String> = i.sectors.iter().take(3).cloned().collect();
    format!(
        "{}: {}, {}, {}",
        i.name,
        or_na(&i.cheque_size),
        joined(&i.stages, "/"),
        joined(&sectors, "/")
    )
}

fn section(items: &[Resource], line: fn(&Resource) -> String) -> String {
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

/// Cut a string to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Dataset section of the advisor prompt
///
/// With a ranked profile only the best resources per category are embedded,
/// so nearby and sector-relevant records win the limited context.
pub fn advisor_context(
    catalog: &Catalog,
    matcher: &Matcher,
    profile: Option<&Profile>,
    limits: ContextLimits,
) -> String {
    let (grants, incubators, investors): (Vec<Resource>, Vec<Resource>, Vec<Resource>) =
        match profile.filter(|p| p.has_sector()) {
            Some(profile) => {
                let ranked = matcher.recommend_top(profile, catalog, limits.per_category);
                let resources = |list: Vec<MatchResult>| -> Vec<Resource> {
                    list.into_iter().map(|m| m.resource).collect()
                };
                (
                    resources(ranked.top_grants),
                    resources(ranked.top_incubators),
                    resources(ranked.top_investors),
                )
            }
            None => (
                catalog.grants().to_vec(),
                catalog.incubators().to_vec(),
                catalog.investors().to_vec(),
            ),
        };

    let data = format!(
        "GRANTS & SCHEMES ({} of {} total):\n{}\n\nINCUBATORS ({} of {} total):\n{}\n\nINVESTORS ({} of {} total):\n{}",
        grants.len(),
        catalog.grants().len(),
        section(&grants, grant_line),
        incubators.len(),
        catalog.incubators().len(),
        section(&incubators, incubator_line),
        investors.len(),
        catalog.investors().len(),
        section(&investors, investor_line),
    );

    truncate_chars(&data, limits.max_chars).to_string()
}

/// Founder profile line appended to the system prompt
pub fn profile_context(profile: Option<&Profile>) -> String {
    match profile.filter(|p| p.has_sector()) {
        Some(p) => format!(
            "Founder profile: {}, Sector: {}, Stage: {}, Team: {}, Location: {}, Revenue: {}, Research/IP: {}",
            p.startup_name.as_deref().unwrap_or("Unknown"),
            p.sector(),
            p.stage(),
            p.team_background(),
            p.geography(),
            p.revenue.as_deref().unwrap_or("N/A"),
            if p.research_based() { "Yes" } else { "No" }
        ),
        None => "Founder has not completed profile yet. Encourage them to complete it at /onboarding.".to_string(),
    }
}

/// Full system prompt for the startup advisor
pub fn advisor_system_prompt(
    catalog: &Catalog,
    matcher: &Matcher,
    profile: Option<&Profile>,
    limits: ContextLimits,
) -> String {
    format!(
        "You are SEGPT — an AI advisor helping Indian startup founders find grants, incubators, and investors.\n\n{}\n\n{}\n\n{}",
        advisor_context(catalog, matcher, profile, limits),
        ADVISOR_RULES,
        profile_context(profile)
    )
}

fn directory_line(item: &DirectoryEntry) -> String {
    format!(
        "- **{}** ({} {} in {}, {}): Equity: {} ({}), Ideal Stage: {}, Fee: {}, Funding: {}, Contact: {}",
        item.name,
        item.broad_type.as_str(),
        item.kind,
        item.sub_region.as_str(),
        item.area,
        item.equity_taken,
        item.equity_category.as_str(),
        item.ideal_stage,
        item.fee,
        item.funding_guarantee,
        item.contact_details
    )
}

/// System prompt restricting the directory advisor to the listing
pub fn directory_system_prompt(catalog: &Catalog, max_chars: usize) -> String {
    let listing = catalog
        .directory()
        .iter()
        .map(directory_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nDIRECTORY DATA:\n{}",
        DIRECTORY_RULES,
        truncate_chars(&listing, max_chars)
    )
}

/// Keep only user/assistant turns, the most recent `window` of them
pub fn recent_history(history: &[ChatMessage], window: usize) -> Vec<ChatMessage> {
    let turns: Vec<&ChatMessage> = history
        .iter()
        .filter(|m| matches!(m.role, ChatRole::User | ChatRole::Assistant))
        .collect();
    let skip = turns.len().saturating_sub(window);
    turns.into_iter().skip(skip).cloned().collect()
}

pub fn missing_key_warning(var: &str) -> String {
    format!("⚠️ **AI Config Missing**: The `{}` is not set in environment variables.", var)
}

pub fn failed_status_reply(status: u16) -> String {
    format!("⚠️ **AI Call Failed (Status {})**: Please try again later.", status)
}

/// Rewrite `**bold**` spans as `<strong>` tags
pub fn bold_to_html(text: &str) -> String {
    BOLD_RE.replace_all(text, "<strong>$1</strong>").into_owned()
}

/// Locally generated reply used when the vendor is unavailable
///
/// Keyword-matched against the user's message: grants, incubators, investors,
/// otherwise a short help menu.
pub fn fallback_reply(message: &str, profile: Option<&Profile>, catalog: &Catalog) -> String {
    let q = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| q.contains(w));

    if mentions(&["grant", "funding", "scheme"]) {
        let stage = profile
            .map(|p| p.stage())
            .filter(|s| !s.is_empty())
            .unwrap_or("Idea");
        let relevant: Vec<String> = catalog
            .grants()
            .iter()
            .filter(|g| g.stages.iter().any(|s| s.eq_ignore_ascii_case(stage)))
            .take(3)
            .map(|g| {
                format!(
                    "**{}** ({})\n- Funding: {}\n- Sectors: {}\n- [Visit Website]({})",
                    g.name,
                    or_na(&g.provider),
                    or_na(&g.funding),
                    g.sectors.join(", "),
                    g.website.as_deref().unwrap_or("#")
                )
            })
            .collect();
        return format!(
            "Here are some grants relevant to your **{}** stage:\n\n{}",
            stage,
            relevant.join("\n\n")
        );
    }

    if mentions(&["incubator", "accelerator"]) {
        let relevant: Vec<String> = catalog
            .incubators()
            .iter()
            .take(3)
            .map(|i| {
                format!(
                    "**{}** ({})\n- Type: {}\n- Equity: {}\n- [Visit Website]({})",
                    i.name,
                    i.region(),
                    or_na(&i.kind),
                    or_na(&i.equity),
                    i.website.as_deref().unwrap_or("#")
                )
            })
            .collect();
        return format!("Here are some top incubators:\n\n{}", relevant.join("\n\n"));
    }

    if mentions(&["investor", "vc", "angel"]) {
        let relevant: Vec<String> = catalog
            .investors()
            .iter()
            .take(3)
            .map(|i| {
                format!(
                    "**{}** ({})\n- Cheque Size: {}\n- Sectors: {}\n- [Visit Website]({})",
                    i.name,
                    or_na(&i.kind),
                    or_na(&i.cheque_size),
                    i.sectors.join(", "),
                    i.website.as_deref().unwrap_or("#")
                )
            })
            .collect();
        return format!("Here are some investors to explore:\n\n{}", relevant.join("\n\n"));
    }

    HELP_MENU.to_string()
}
