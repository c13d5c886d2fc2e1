use crate::utils::{assert_silent, expect_deliveries, init_tracing, join, spawn_room};
use syncroom_core::{ChatDraft, MessageKind, RoomId, ServerEvent, UserId};
use syncroom_server::RoomCommand;

fn draft(room: &str, user: &str, content: &str) -> ChatDraft {
    ChatDraft {
        room_id: RoomId::from(room),
        user_id: UserId::from(user),
        username: user.to_string(),
        kind: MessageKind::Text,
        content: Some(content.to_string()),
        voice_ref: None,
    }
}

#[tokio::test]
async fn message_is_echoed_to_sender_with_server_identity() {
    init_tracing();
    let mut room = spawn_room("r-chat");

    let a = join(&room, "ada").await;
    expect_deliveries(&mut room.rx, 1).await;
    let b = join(&room, "brian").await;
    expect_deliveries(&mut room.rx, 3).await;

    room.tx
        .send(RoomCommand::Chat {
            draft: draft("r-chat", "ada", "hello"),
        })
        .await
        .unwrap();
    let deliveries = expect_deliveries(&mut room.rx, 2).await;

    let mut recipients = Vec::new();
    let mut ids = Vec::new();
    for (to, event) in &deliveries {
        let ServerEvent::ReceiveMessage(message) = event else {
            panic!("expected receive_message");
        };
        assert_eq!(message.draft.content.as_deref(), Some("hello"));
        assert_eq!(message.draft.username, "ada");
        recipients.push(*to);
        ids.push(message.id);
    }
    assert!(recipients.contains(&a), "sender receives its own echo");
    assert!(recipients.contains(&b));
    assert_eq!(ids[0], ids[1], "one stamped message, fanned out as-is");
    assert_silent(&mut room.rx).await;
}

#[tokio::test]
async fn message_ids_are_unique_across_the_relay() {
    init_tracing();
    let mut room = spawn_room("r-chat-ids");

    join(&room, "ada").await;
    expect_deliveries(&mut room.rx, 1).await;

    room.tx
        .send(RoomCommand::Chat {
            draft: draft("r-chat-ids", "ada", "first"),
        })
        .await
        .unwrap();
    room.tx
        .send(RoomCommand::Chat {
            draft: draft("r-chat-ids", "ada", "second"),
        })
        .await
        .unwrap();
    let deliveries = expect_deliveries(&mut room.rx, 2).await;

    let ids: Vec<_> = deliveries
        .iter()
        .map(|(_, event)| {
            let ServerEvent::ReceiveMessage(message) = event else {
                panic!("expected receive_message");
            };
            message.id
        })
        .collect();
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn voice_messages_relay_their_reference() {
    init_tracing();
    let mut room = spawn_room("r-voice");

    join(&room, "ada").await;
    expect_deliveries(&mut room.rx, 1).await;

    let mut voice = draft("r-voice", "ada", "");
    voice.kind = MessageKind::Voice;
    voice.content = None;
    voice.voice_ref = Some("voices/clip-17.webm".into());

    room.tx
        .send(RoomCommand::Chat { draft: voice })
        .await
        .unwrap();
    let deliveries = expect_deliveries(&mut room.rx, 1).await;

    let (_, ServerEvent::ReceiveMessage(message)) = &deliveries[0] else {
        panic!("expected receive_message");
    };
    assert_eq!(message.draft.kind, MessageKind::Voice);
    assert_eq!(message.draft.voice_ref.as_deref(), Some("voices/clip-17.webm"));
    assert!(message.draft.content.is_none());
}

#[tokio::test]
async fn typing_indicators_skip_the_sender() {
    init_tracing();
    let mut room = spawn_room("r-typing");

    let a = join(&room, "ada").await;
    expect_deliveries(&mut room.rx, 1).await;
    let b = join(&room, "brian").await;
    expect_deliveries(&mut room.rx, 3).await;

    room.tx
        .send(RoomCommand::Typing {
            from: a,
            username: "ada".into(),
        })
        .await
        .unwrap();
    let deliveries = expect_deliveries(&mut room.rx, 1).await;
    assert!(
        matches!(&deliveries[0], (to, ServerEvent::Typing { username }) if *to == b && username == "ada")
    );

    room.tx
        .send(RoomCommand::StopTyping {
            from: a,
            username: "ada".into(),
        })
        .await
        .unwrap();
    let deliveries = expect_deliveries(&mut room.rx, 1).await;
    assert!(
        matches!(&deliveries[0], (to, ServerEvent::StopTyping { username }) if *to == b && username == "ada")
    );
    assert_silent(&mut room.rx).await;
}
