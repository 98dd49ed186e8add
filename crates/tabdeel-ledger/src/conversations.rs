//! Conversation Derivation: a conversation is not stored anywhere, it is a
//! view over an accepted swap request plus that request's message thread.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use tabdeel_db::Database;
use tabdeel_types::models::{Conversation, Message, SwapRequest, SwapStatus};

use crate::error::{LedgerError, Result};
use crate::swaps::merge_unique;

/// The user's inbox: one conversation per accepted request they are part of,
/// most recently active first. The request's own `updated_at` is the
/// activity clock; message sends bump it.
pub fn list_conversations(db: &Database, user_id: Uuid) -> Result<Vec<Conversation>> {
    let sent = db.list_swaps_by_requester(user_id, Some(SwapStatus::Accepted))?;
    let received = db.list_swaps_by_target_owner(user_id, Some(SwapStatus::Accepted))?;
    let accepted = merge_unique(sent, received);

    let mut conversations = Vec::with_capacity(accepted.len());
    for request in accepted {
        let other_id = request.other_party(user_id);
        let Some(other_user) = db.get_user(other_id)? else {
            // Orphaned counterparty; keep the inbox rendering.
            warn!("conversation {} references missing user {}", request.id, other_id);
            continue;
        };
        let last_message = db.latest_message(request.id)?;
        conversations.push(Conversation {
            id: request.id,
            swap_request: request,
            other_user,
            last_message,
        });
    }

    conversations.sort_by(|a, b| {
        b.swap_request
            .updated_at
            .cmp(&a.swap_request.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(conversations)
}

/// Full thread, oldest first. Participants only, accepted requests only.
pub fn open_thread(db: &Database, conversation_id: Uuid, user_id: Uuid) -> Result<Vec<Message>> {
    let request = load_accessible(db, conversation_id, user_id)?;
    require_accepted(&request)?;
    Ok(db.list_messages(conversation_id)?)
}

pub fn send_message(
    db: &Database,
    conversation_id: Uuid,
    sender_id: Uuid,
    text: &str,
) -> Result<Message> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LedgerError::Validation("message text must not be empty".into()));
    }

    let request = load_accessible(db, conversation_id, sender_id)?;
    require_accepted(&request)?;

    let message = Message {
        id: Uuid::new_v4(),
        swap_request_id: conversation_id,
        sender_id,
        text: text.to_string(),
        created_at: Utc::now(),
    };
    db.append_message(&message)?;
    Ok(message)
}

fn load_accessible(db: &Database, conversation_id: Uuid, user_id: Uuid) -> Result<SwapRequest> {
    let request = db
        .get_swap_request(conversation_id)?
        .ok_or(LedgerError::NotFound("conversation"))?;
    if !request.is_participant(user_id) {
        return Err(LedgerError::Permission(
            "only the two swap parties can access this conversation".into(),
        ));
    }
    Ok(request)
}

fn require_accepted(request: &SwapRequest) -> Result<()> {
    if request.status != SwapStatus::Accepted {
        return Err(LedgerError::InvalidState(format!(
            "conversation requires an accepted request, this one is {}",
            request.status.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swaps;
    use crate::testutil::{db, list, offer, register};
    use tabdeel_types::api::SwapDecision;
    use tabdeel_types::models::{Item, User};
    use tabdeel_db::Database;

    struct Pair {
        ahmed: User,
        zainab: User,
        guitar: Item,
        ball: Item,
    }

    fn pair(db: &Database) -> Pair {
        let ahmed = register(db, "ahmed", "Karachi");
        let zainab = register(db, "zainab", "Lahore");
        let guitar = list(db, &zainab, "Guitar");
        let ball = list(db, &ahmed, "Cricket ball");
        Pair { ahmed, zainab, guitar, ball }
    }

    #[test]
    fn conversation_exists_only_once_accepted() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);

        assert!(list_conversations(&db, p.ahmed.id).unwrap().is_empty());
        assert!(list_conversations(&db, p.zainab.id).unwrap().is_empty());

        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Accept).unwrap();

        let for_requester = list_conversations(&db, p.ahmed.id).unwrap();
        let for_owner = list_conversations(&db, p.zainab.id).unwrap();
        assert_eq!(for_requester.len(), 1);
        assert_eq!(for_owner.len(), 1);
        assert_eq!(for_requester[0].id, request.id);
        assert_eq!(for_requester[0].other_user.id, p.zainab.id);
        assert_eq!(for_owner[0].other_user.id, p.ahmed.id);
        // Fresh conversation: no last message yet.
        assert!(for_requester[0].last_message.is_none());
    }

    #[test]
    fn declined_requests_never_become_conversations() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Decline).unwrap();

        assert!(list_conversations(&db, p.ahmed.id).unwrap().is_empty());
        assert!(list_conversations(&db, p.zainab.id).unwrap().is_empty());
    }

    #[test]
    fn thread_access_is_participants_only() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Accept).unwrap();

        let stranger = register(&db, "bilal", "Multan");
        assert!(matches!(
            open_thread(&db, request.id, stranger.id),
            Err(LedgerError::Permission(_))
        ));
        assert!(matches!(
            send_message(&db, request.id, stranger.id, "hello"),
            Err(LedgerError::Permission(_))
        ));

        assert!(open_thread(&db, request.id, p.ahmed.id).unwrap().is_empty());
    }

    #[test]
    fn messaging_requires_an_accepted_request() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);

        // Still pending: participants can neither read nor write the thread.
        assert!(matches!(
            send_message(&db, request.id, p.ahmed.id, "hello"),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(matches!(
            open_thread(&db, request.id, p.ahmed.id),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(db.list_messages(request.id).unwrap().is_empty());
    }

    #[test]
    fn empty_messages_are_rejected() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Accept).unwrap();

        let err = send_message(&db, request.id, p.ahmed.id, "   \n ");
        assert!(matches!(err, Err(LedgerError::Validation(_))));
        assert!(db.list_messages(request.id).unwrap().is_empty());
    }

    #[test]
    fn accepted_swap_unlocks_thread_and_stays_terminal() {
        let db = db();
        let p = pair(&db);

        // A offers their ball for B's guitar.
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        assert_eq!(request.status, SwapStatus::Pending);

        // B accepts; both inboxes now show the conversation.
        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Accept).unwrap();
        assert_eq!(list_conversations(&db, p.ahmed.id).unwrap().len(), 1);
        assert_eq!(list_conversations(&db, p.zainab.id).unwrap().len(), 1);

        // A greets; B sees one message from A.
        send_message(&db, request.id, p.ahmed.id, "hi").unwrap();
        let thread = open_thread(&db, request.id, p.zainab.id).unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].sender_id, p.ahmed.id);
        assert_eq!(thread[0].text, "hi");

        // B tries to take it back: the transition already happened.
        let err = swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Decline);
        assert!(matches!(err, Err(LedgerError::InvalidState(_))));
        assert_eq!(
            db.get_swap_request(request.id).unwrap().unwrap().status,
            SwapStatus::Accepted
        );
    }

    #[test]
    fn message_activity_reorders_the_inbox() {
        let db = db();
        let p = pair(&db);
        let bilal = register(&db, "bilal", "Multan");
        let novels = list(&db, &bilal, "Novels");
        let bat = list(&db, &p.ahmed, "Cricket bat");

        let with_zainab = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        swaps::respond(&db, with_zainab.id, p.zainab.id, SwapDecision::Accept).unwrap();
        let with_bilal = offer(&db, &p.ahmed, &novels, &bat);
        swaps::respond(&db, with_bilal.id, bilal.id, SwapDecision::Accept).unwrap();

        // Accepted later, so bilal's conversation leads.
        let inbox = list_conversations(&db, p.ahmed.id).unwrap();
        assert_eq!(inbox[0].id, with_bilal.id);

        // A message in the older conversation moves it back on top.
        send_message(&db, with_zainab.id, p.zainab.id, "still interested?").unwrap();
        let inbox = list_conversations(&db, p.ahmed.id).unwrap();
        assert_eq!(inbox[0].id, with_zainab.id);
        assert_eq!(
            inbox[0].last_message.as_ref().map(|m| m.text.as_str()),
            Some("still interested?")
        );
    }

    #[test]
    fn repeated_reads_are_identical() {
        let db = db();
        let p = pair(&db);
        let request = offer(&db, &p.ahmed, &p.guitar, &p.ball);
        swaps::respond(&db, request.id, p.zainab.id, SwapDecision::Accept).unwrap();
        send_message(&db, request.id, p.ahmed.id, "one").unwrap();
        send_message(&db, request.id, p.zainab.id, "two").unwrap();

        let first: Vec<_> = list_conversations(&db, p.ahmed.id)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        let second: Vec<_> = list_conversations(&db, p.ahmed.id)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(first, second);

        let texts = |msgs: Vec<Message>| -> Vec<String> {
            msgs.into_iter().map(|m| m.text).collect()
        };
        let t1 = texts(open_thread(&db, request.id, p.ahmed.id).unwrap());
        let t2 = texts(open_thread(&db, request.id, p.ahmed.id).unwrap());
        assert_eq!(t1, t2);
    }
}
