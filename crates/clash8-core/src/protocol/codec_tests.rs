use crate::protocol::{
    ClientMessage, Command, EndClientTurn, Login, LoginFailed, LoginOk, ProtocolError,
    ServerMessage, ShutdownInfo, MSG_END_CLIENT_TURN, MSG_LOGIN, MSG_LOGIN_OK, MSG_SHUTDOWN_INFO,
};

#[test]
fn login_round_trip() {
    let msg = ClientMessage::Login(Login {
        account_id: 4_000_000_123,
        pass_token: Some("a1b2c3".into()),
        major_version: 8,
        minor_version: 551,
        build_version: 1,
        resource_sha: Some("deadbeef".into()),
        device: Some("iPhone8,1".into()),
        locale: None,
    });

    let body = msg.encode();
    let decoded = ClientMessage::decode(MSG_LOGIN, &body).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn login_with_absent_fields_round_trip() {
    let msg = ClientMessage::Login(Login::default());
    let body = msg.encode();
    assert_eq!(ClientMessage::decode(MSG_LOGIN, &body).unwrap(), msg);
}

#[test]
fn end_client_turn_round_trip() {
    let msg = ClientMessage::EndClientTurn(EndClientTurn {
        subtick: 630,
        checksum: 0x1020_3040,
        commands: vec![
            Command::SpeedUpHero { hero_id: 28_000_000 },
            Command::SpeedUpHero { hero_id: 28_000_001 },
        ],
    });

    let body = msg.encode();
    let decoded = ClientMessage::decode(MSG_END_CLIENT_TURN, &body).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn end_client_turn_rejects_bogus_command_count() {
    // subtick + checksum + a count far beyond the remaining bytes.
    let mut body = Vec::new();
    body.extend_from_slice(&630u32.to_be_bytes());
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&0xffff_ff00u32.to_be_bytes());

    assert!(matches!(
        ClientMessage::decode(MSG_END_CLIENT_TURN, &body),
        Err(ProtocolError::Truncated)
    ));
}

#[test]
fn unknown_command_is_rejected() {
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&2u32.to_be_bytes());
    body.extend_from_slice(&1u32.to_be_bytes()); // one command
    body.extend_from_slice(&999u32.to_be_bytes()); // with an unknown id

    assert!(matches!(
        ClientMessage::decode(MSG_END_CLIENT_TURN, &body),
        Err(ProtocolError::UnknownCommand(999))
    ));
}

#[test]
fn server_messages_round_trip() {
    let cases = [
        ServerMessage::LoginFailed(LoginFailed {
            reason: 10,
            message: Some("maintenance".into()),
        }),
        ServerMessage::LoginOk(LoginOk {
            account_id: 1,
            home_id: 1,
            pass_token: Some("tok".into()),
            server_environment: Some("prod".into()),
            session_count: 42,
        }),
        ServerMessage::KeepAliveOk,
        ServerMessage::ShutdownInfo(ShutdownInfo {
            seconds_remaining: 600,
        }),
    ];

    for msg in cases {
        let body = msg.encode();
        assert_eq!(ServerMessage::decode(msg.id(), &body).unwrap(), msg);
    }
}

#[test]
fn unknown_message_id_is_rejected() {
    assert!(matches!(
        ClientMessage::decode(9999, &[]),
        Err(ProtocolError::UnknownMessage(9999))
    ));
    assert!(matches!(
        ServerMessage::decode(MSG_LOGIN, &[]),
        Err(ProtocolError::UnknownMessage(MSG_LOGIN))
    ));
}

#[test]
fn shutdown_info_is_four_bytes() {
    let msg = ServerMessage::ShutdownInfo(ShutdownInfo {
        seconds_remaining: 90,
    });
    assert_eq!(msg.encode().len(), 4);
    assert_eq!(msg.id(), MSG_SHUTDOWN_INFO);
}

#[test]
fn message_ids_are_stable() {
    use crate::protocol::{
        CMD_SPEED_UP_HERO, MSG_KEEP_ALIVE, MSG_KEEP_ALIVE_OK, MSG_LOGIN_FAILED,
        PROTOCOL_VERSION_V8,
    };

    assert_eq!(PROTOCOL_VERSION_V8, 8);
    assert_eq!(MSG_LOGIN, 10101);
    assert_eq!(MSG_KEEP_ALIVE, 10108);
    assert_eq!(MSG_END_CLIENT_TURN, 14102);
    assert_eq!(MSG_LOGIN_FAILED, 20103);
    assert_eq!(MSG_LOGIN_OK, 20104);
    assert_eq!(MSG_KEEP_ALIVE_OK, 20108);
    assert_eq!(MSG_SHUTDOWN_INFO, 20161);
    assert_eq!(CMD_SPEED_UP_HERO, 521);
}
