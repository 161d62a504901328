//! Conversation visibility - each party's view of the log
//!
//! The buyer sees everything addressed to them (in practice, the whole
//! conversation). A seller sees buyer messages and its own replies, never a
//! competitor's private replies, even if a visibility list was populated
//! too broadly upstream.

use dealforge_types::{Message, SenderType};

/// Project the conversation down to what one party may read
pub fn filter_history(history: &[Message], viewer_id: &str, viewer_type: SenderType) -> Vec<Message> {
    history
        .iter()
        .filter(|msg| {
            if !msg.visible_to(viewer_id) {
                return false;
            }
            match viewer_type {
                SenderType::Buyer => true,
                // A seller reads the buyer and itself only
                SenderType::Seller => {
                    msg.sender_type == SenderType::Buyer || msg.sender_id == viewer_id
                }
            }
        })
        .cloned()
        .collect()
}
