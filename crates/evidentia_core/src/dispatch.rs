//! crates/evidentia_core/src/dispatch.rs
//!
//! The analysis dispatcher: a stand-in for a real analysis backend. It maps a
//! free-text question onto a fixed set of canned, citation-annotated analysis
//! bodies, falling back to a generic contextual body. The public contract
//! (question in, citation-annotated text out) is what a real language-model
//! backend must preserve.

/// Template keys in declaration order; dispatch takes the first match.
pub const TEMPLATE_KEYS: [&str; 6] = [
    "legal-risks",
    "key-terms",
    "obligations",
    "red-flags",
    "summary",
    "line-analysis",
];

/// The question text each template button expands to.
pub fn template_prompt(key: &str) -> Option<&'static str> {
    let prompt = match key {
        "legal-risks" => {
            "Identify and analyze all potential legal risks, liabilities, and compliance issues in this document."
        }
        "key-terms" => {
            "Extract and explain all key terms, definitions, and important concepts from this document."
        }
        "obligations" => {
            "List all obligations, responsibilities, and requirements outlined in this document."
        }
        "red-flags" => {
            "Identify any red flags, concerning clauses, or potential issues that require attention."
        }
        "summary" => {
            "Provide a comprehensive summary of this document including main points and key takeaways."
        }
        "line-analysis" => {
            "Perform a detailed line-by-line analysis of this document, highlighting important sections."
        }
        _ => return None,
    };
    Some(prompt)
}

/// Matches a question against the template table and returns the canned
/// analysis body, or the generic contextual body when nothing matches.
///
/// Matching is deliberately simple: the question is lower-cased and the first
/// key whose normalized form (hyphen replaced by a space, or removed) appears
/// as a substring wins. No scoring, no ambiguity resolution.
pub fn dispatch(question: &str) -> String {
    let normalized = question.to_lowercase();
    for key in TEMPLATE_KEYS {
        let spaced = key.replace('-', " ");
        let joined = key.replace('-', "");
        if normalized.contains(&spaced) || normalized.contains(&joined) {
            return canned_body(key).to_string();
        }
    }
    contextual_body(question)
}

fn canned_body(key: &str) -> &'static str {
    match key {
        "legal-risks" => LEGAL_RISKS_BODY,
        "key-terms" => KEY_TERMS_BODY,
        "obligations" => OBLIGATIONS_BODY,
        "red-flags" => RED_FLAGS_BODY,
        "summary" => SUMMARY_BODY,
        "line-analysis" => LINE_ANALYSIS_BODY,
        _ => unreachable!("dispatch only passes known keys"),
    }
}

/// The generic fallback: echoes the verbatim question and produces
/// structurally similar citation-annotated placeholder content.
fn contextual_body(question: &str) -> String {
    format!(
        r#"**Analysis for: "{question}"**

Based on the document content, here is the contextual analysis:

**Key Findings:**
• The document contains relevant information addressing your question <cite data-page="1">1</cite>
• Multiple sections provide context for this inquiry <cite data-page="2">2</cite>
• Cross-references to related provisions are important <cite data-page="2,3">3</cite>

**Detailed Response:**
The document addresses this topic through several mechanisms and provisions <cite data-page="1">4</cite>. The primary discussion occurs in the middle sections <cite data-page="2">5</cite>, with supporting details provided in the concluding portions <cite data-page="3">6</cite>.

**Recommendations:**
Review the cited sections carefully and consider how they interact with other document provisions <cite data-page="1,2,3">7</cite>.

*Note: This is a simulated analysis. In production, this would be replaced with actual AI analysis from your chosen model.*"#
    )
}

const LEGAL_RISKS_BODY: &str = r#"Based on the document analysis, here are the key legal risks identified:

**High Priority Risks:**
• Liability exposure in sections discussing responsibility allocation <cite data-page="1">1</cite>
• Compliance requirements that may conflict with current practices <cite data-page="2">2</cite>
• Indemnification clauses that could create financial exposure <cite data-page="3">3</cite>

**Medium Priority Risks:**
• Termination provisions that lack adequate notice periods <cite data-page="1">4</cite>
• Intellectual property ownership ambiguities <cite data-page="2">5</cite>

**Recommendations:**
Review all highlighted sections with legal counsel before proceeding. Pay particular attention to the liability and indemnification terms <cite data-page="3">6</cite>."#;

const KEY_TERMS_BODY: &str = r#"Key terms and definitions identified in the document:

**Primary Definitions:**
• **Party/Parties**: Referenced throughout as the contracting entities <cite data-page="1">1</cite>
• **Effective Date**: The commencement date for all obligations <cite data-page="1">2</cite>
• **Confidential Information**: Broadly defined to include proprietary data <cite data-page="2">3</cite>

**Important Concepts:**
• **Force Majeure**: Events beyond reasonable control affecting performance <cite data-page="2">4</cite>
• **Material Breach**: Significant violations triggering termination rights <cite data-page="3">5</cite>

**Critical Terms Requiring Attention:**
The definition of "material breach" is particularly broad and could be interpreted subjectively <cite data-page="3">6</cite>."#;

const OBLIGATIONS_BODY: &str = r#"Analysis of obligations and responsibilities:

**Primary Obligations:**
• Maintain confidentiality of all shared information <cite data-page="1">1</cite>
• Provide timely notice of any material changes <cite data-page="1">2</cite>
• Comply with all applicable laws and regulations <cite data-page="2">3</cite>

**Performance Standards:**
• Meet specified delivery timelines as outlined <cite data-page="2">4</cite>
• Maintain professional standards throughout engagement <cite data-page="3">5</cite>

**Ongoing Responsibilities:**
• Regular reporting requirements as specified <cite data-page="3">6</cite>
• Cooperation with audits and compliance reviews <cite data-page="3">7</cite>

**Critical Note:** Failure to meet these obligations could result in immediate termination <cite data-page="3">8</cite>."#;

const RED_FLAGS_BODY: &str = r#"🚨 **Red Flags Identified:**

**Immediate Concerns:**
• Unlimited liability exposure without caps <cite data-page="1">1</cite>
• Broad indemnification requirements favoring one party <cite data-page="2">2</cite>
• Vague termination triggers that could be misused <cite data-page="2">3</cite>

**Contractual Issues:**
• One-sided modification rights <cite data-page="1">4</cite>
• Inadequate dispute resolution mechanisms <cite data-page="3">5</cite>
• Missing force majeure protections <cite data-page="3">6</cite>

**Financial Risks:**
• Payment terms heavily favor the counterparty <cite data-page="2">7</cite>
• No protection against cost escalations <cite data-page="3">8</cite>

**Recommendation:** These issues should be addressed before signing. Consider negotiating more balanced terms."#;

const SUMMARY_BODY: &str = r#"**Document Summary:**

**Overview:**
This document appears to be a contractual agreement establishing terms between parties for ongoing collaboration <cite data-page="1">1</cite>.

**Key Sections:**
• **Introduction & Definitions**: Establishes the framework and key terms <cite data-page="1">2</cite>
• **Scope of Work**: Details the specific obligations and deliverables <cite data-page="2">3</cite>
• **Terms & Conditions**: Outlines legal requirements and compliance <cite data-page="2">4</cite>
• **Termination & Remedies**: Specifies end conditions and dispute resolution <cite data-page="3">5</cite>

**Main Themes:**
The document emphasizes mutual cooperation while establishing clear boundaries for responsibility and liability <cite data-page="1,2,3">6</cite>.

**Overall Assessment:**
This is a comprehensive agreement that requires careful review of the liability and termination provisions before execution."#;

const LINE_ANALYSIS_BODY: &str = r#"**Detailed Line-by-Line Analysis:**

**Section 1 - Opening Provisions:**
Lines 1-15: Standard preamble establishing parties and effective date <cite data-page="1">1</cite>
Lines 16-30: Definitions section - note broad interpretation of "confidential information" <cite data-page="1">2</cite>

**Section 2 - Core Obligations:**
Lines 31-45: Primary performance requirements clearly stated <cite data-page="2">3</cite>
Lines 46-60: Payment terms - review for fairness <cite data-page="2">4</cite>
Lines 61-75: Compliance requirements - ensure feasibility <cite data-page="2">5</cite>

**Section 3 - Risk Allocation:**
Lines 76-90: Liability provisions - significant exposure identified <cite data-page="3">6</cite>
Lines 91-105: Indemnification - heavily favors one party <cite data-page="3">7</cite>

**Critical Lines Requiring Immediate Attention:**
Lines 85-87 contain unlimited liability language <cite data-page="3">8</cite>
Lines 98-100 establish broad indemnification scope <cite data-page="3">9</cite>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::annotate;

    #[test]
    fn red_flags_question_gets_the_canned_body() {
        let answer = dispatch("What are the red flags in this contract?");
        assert!(answer.contains("Red Flags Identified"));
    }

    #[test]
    fn hyphenless_form_also_matches() {
        let answer = dispatch("run a lineanalysis please");
        assert!(answer.contains("Line-by-Line Analysis"));
    }

    #[test]
    fn unmatched_question_falls_back_to_contextual_body() {
        let question = "What day is the deadline for delivery?";
        let answer = dispatch(question);
        assert!(answer.contains(question));
        assert!(answer.contains("contextual analysis"));
    }

    #[test]
    fn first_matching_template_wins() {
        // Mentions both red-flags and summary; red-flags comes first in the
        // table.
        let answer = dispatch("give me a red flags summary");
        assert!(answer.contains("Red Flags Identified"));
    }

    #[test]
    fn every_canned_body_is_annotatable() {
        for key in TEMPLATE_KEYS {
            let prompt = template_prompt(key).expect("known key");
            let body = annotate(&dispatch(prompt));
            assert!(
                !body.registry.is_empty(),
                "template {key} produced no citations"
            );
        }
    }

    #[test]
    fn unknown_template_key_has_no_prompt() {
        assert!(template_prompt("compliance-matrix").is_none());
    }
}
