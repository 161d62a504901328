//! Reply sanitation shared by the agents

/// Remove `<think>...</think>` reasoning blocks some local models emit
/// despite instructions, then trim
pub(crate) fn sanitize_reply(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        match rest.find("<think>") {
            Some(start) => {
                out.push_str(&rest[..start]);
                match rest[start..].find("</think>") {
                    Some(rel_end) => {
                        rest = &rest[start + rel_end + "</think>".len()..];
                    }
                    None => {
                        // Unterminated block: drop everything after the tag
                        rest = "";
                    }
                }
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_think_blocks() {
        assert_eq!(
            sanitize_reply("<think>hmm, strategy</think>I can do $45."),
            "I can do $45."
        );
    }

    #[test]
    fn strips_unterminated_block() {
        assert_eq!(sanitize_reply("Deal at $40. <think>should I"), "Deal at $40.");
    }

    #[test]
    fn passes_clean_text_through() {
        assert_eq!(sanitize_reply("  plain reply  "), "plain reply");
    }
}
