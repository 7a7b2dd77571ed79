//! System prompts for the regulatory advisor.

use crate::knowledge::{EffectiveSet, VERSION_DATE_FORMAT};

/// System prompt template. `{reference_date}` and `{context}` are filled in
/// by [`build_system_instruction`].
pub const ADVISOR_SYSTEM_PROMPT: &str = r"You are an expert on the French energy savings certificate scheme (CEE) for the Ministry of Ecological Transition.
Reference date: {reference_date}.

INSTRUCTIONS:
1. Use the local context below first.
2. Use Google Search to complete it when needed.
3. Cite the standardized operation sheets by code (e.g. BAR-TH-164).
4. Only rely on rules in force at the reference date.

LOCAL CONTEXT:
{context}";

/// Render one line per document: `[DOC]` lines for policies, then `[SHEET]`
/// lines for the selected sheet versions.
#[must_use]
pub fn format_context(effective: &EffectiveSet<'_>) -> String {
    let policies = effective
        .policies()
        .map(|d| format!("[DOC] {}: {} (Source: {})", d.title, d.content, d.url));
    let sheets = effective.sheets().map(|d| {
        format!(
            "[SHEET] {}: {}. Date: {}. Content: {}",
            d.label(),
            d.title,
            d.version_date.format(VERSION_DATE_FORMAT),
            d.content
        )
    });

    policies.chain(sheets).collect::<Vec<_>>().join("\n")
}

/// Build the system instruction for a question asked at the set's reference date.
#[must_use]
pub fn build_system_instruction(effective: &EffectiveSet<'_>) -> String {
    let reference_date = effective
        .reference_date()
        .format(VERSION_DATE_FORMAT)
        .to_string();

    ADVISOR_SYSTEM_PROMPT
        .replace("{reference_date}", &reference_date)
        .replace("{context}", &format_context(effective))
}
