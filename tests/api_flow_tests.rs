use leader_duel::rocket_initialize;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use rocket::serde::json::serde_json;

fn post_action(client: &Client, body: &str) -> (Status, serde_json::Value) {
    let response = client
        .post("/action")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    let status = response.status();
    let body = response.into_string().unwrap_or_default();
    let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    (status, value)
}

fn get_game(client: &Client) -> serde_json::Value {
    let response = client.get("/game").dispatch();
    assert_eq!(response.status(), Status::Ok);
    serde_json::from_str(&response.into_string().expect("body")).expect("json")
}

#[test]
fn test_game_snapshot_has_expected_shape() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let game = get_game(&client);
    assert_eq!(game["turn"]["number"], 1);
    assert_eq!(game["turn"]["phase"], "Main");
    assert_eq!(game["turn"]["current_player"], "Player1");
    for side in ["player1", "player2"] {
        assert_eq!(game["players"][side]["hand"].as_array().map(|a| a.len()), Some(5));
        assert_eq!(game["players"][side]["deck"].as_array().map(|a| a.len()), Some(10));
        assert!(game["players"][side]["leader"]["id"].is_string());
        assert_eq!(game["players"][side]["don"]["active"], 0);
    }
}

#[test]
fn test_reset_game_logs_the_seed() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let response = client.post("/tests/game?seed=5").dispatch();
    assert_eq!(response.status(), Status::Created);

    let response = client.get("/actions/log?action_type=SetSeed").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let log: serde_json::Value =
        serde_json::from_str(&response.into_string().expect("body")).expect("json");
    let entries = log["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["payload"]["seed"], 5);

    let game = get_game(&client);
    assert_eq!(game["players"]["player1"]["deck"].as_array().map(|a| a.len()), Some(10));
}

#[test]
fn test_play_card_not_in_hand_is_rejected() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let (status, _) = post_action(
        &client,
        r#"{ "action_type": "PlayCard", "card_id": "XX99-999" }"#,
    );
    assert_eq!(status, Status::BadRequest);
    // Nothing mutated: hand still holds five cards.
    let game = get_game(&client);
    assert_eq!(
        game["players"]["player1"]["hand"].as_array().map(|a| a.len()),
        Some(5)
    );
}

#[test]
fn test_resolve_choice_with_no_pending_is_rejected() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let (status, _) = post_action(
        &client,
        r#"{ "action_type": "ResolveChoice", "index": 0, "accept": true }"#,
    );
    assert_eq!(status, Status::BadRequest);
}

#[test]
fn test_attack_before_turn_three_is_blocked_not_rejected() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let (status, outcome) = post_action(
        &client,
        r#"{ "action_type": "Attack", "attacker": "leader", "target": "leader" }"#,
    );
    assert_eq!(status, Status::Created);
    let message = outcome["message"].as_str().expect("message");
    assert!(message.contains("turn 3"), "got: {message}");

    let response = client.get("/actions/log?action_type=AttackBlocked").dispatch();
    let log: serde_json::Value =
        serde_json::from_str(&response.into_string().expect("body")).expect("json");
    assert_eq!(log["entries"].as_array().map(|a| a.len()), Some(1));
}

#[test]
fn test_progress_phase_in_main_is_sticky() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let (status, outcome) = post_action(&client, r#"{ "action_type": "ProgressPhase" }"#);
    assert_eq!(status, Status::Created);
    assert!(outcome["message"]
        .as_str()
        .expect("message")
        .contains("main phase"));
    let game = get_game(&client);
    assert_eq!(game["turn"]["phase"], "Main");
}

#[test]
fn test_end_turn_hands_over_or_skips() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let (status, _) = post_action(&client, r#"{ "action_type": "EndTurn" }"#);
    assert_eq!(status, Status::Created);

    let game = get_game(&client);
    let number = game["turn"]["number"].as_u64().expect("turn number");
    match number {
        // Normal handover: Player2 starts at reset, caller drives the phases.
        2 => {
            assert_eq!(game["turn"]["current_player"], "Player2");
            assert_eq!(game["turn"]["phase"], "Reset");
        }
        // Player2 had no playable action and was skipped outright.
        3 => {
            assert_eq!(game["turn"]["current_player"], "Player1");
            assert_eq!(game["turn"]["phase"], "Main");
        }
        other => panic!("unexpected turn number {other}"),
    }
}

#[test]
fn test_playing_from_hand_respects_don_costs() {
    let client = Client::tracked(rocket_initialize()).expect("valid rocket instance");
    let game = get_game(&client);
    let hand: Vec<String> = game["players"]["player1"]["hand"]
        .as_array()
        .expect("hand")
        .iter()
        .map(|v| v.as_str().expect("card id").to_string())
        .collect();

    // Costs of the standard catalog; players start with zero DON!!.
    let cost = |id: &str| -> u64 {
        match id {
            "ST01-006" | "ST01-008" | "OP01-029" => 1,
            "OP01-013" => 3,
            _ => 0,
        }
    };

    let card = hand[0].clone();
    let body = format!(r#"{{ "action_type": "PlayCard", "card_id": "{card}" }}"#);
    let (status, outcome) = post_action(&client, &body);
    if cost(&card) == 0 {
        assert_eq!(status, Status::Created);
        assert_eq!(
            outcome["message"].as_str().expect("message"),
            format!("played {card}")
        );
    } else {
        assert_eq!(status, Status::BadRequest);
        assert!(outcome["message"]
            .as_str()
            .expect("message")
            .contains("insufficient DON!!"));
    }
}
