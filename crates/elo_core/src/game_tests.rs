use super::*;
use serde_json::json;

fn eight_player_game() -> Value {
    json!({
        "participants": {
            "Player_1": "wolf-a", "Player_2": "wolf-b",
            "Player_3": "vill-a", "Player_4": "vill-b",
            "Player_5": "vill-c", "Player_6": "vill-d",
            "Player_7": "vill-e", "Player_8": "vill-f"
        },
        "results": [
            {
                "phase": "setup",
                "action_log": [
                    { "timestamp": "2025-03-01T10:00:05Z", "action": "assign_roles" }
                ]
            },
            {
                "scores": [
                    { "player_name": "Player_1", "team": "werewolves", "role": "werewolf",
                      "won": true, "metrics": { "aggregate_score": 0.825 } },
                    { "player_name": "Player_3", "team": "villagers", "role": "seer",
                      "won": false, "metrics": {} },
                    { "player_name": "Player_9", "team": "villagers", "role": "villager" }
                ],
                "winner": "werewolves",
                "action_log": [
                    { "timestamp": "2025-03-01T10:12:00Z" },
                    { "timestamp": "2025-03-01T10:00:00Z" },
                    { "note": "no timestamp" },
                    { "timestamp": "" }
                ]
            }
        ]
    })
}

#[test]
fn test_parse_valid_game() {
    let game = GameRecord::parse("game_001.json", &eight_player_game(), ROSTER_SIZE).unwrap();

    assert_eq!(game.id, "game_001.json");
    assert_eq!(game.participants.len(), 8);
    assert_eq!(game.scores.len(), 3);
    assert_eq!(game.scores_block, 1);
    assert_eq!(game.winner, Some(json!("werewolves")));
    assert_eq!(game.start_time.as_deref(), Some("2025-03-01T10:00:00Z"));
    assert_eq!(game.end_time.as_deref(), Some("2025-03-01T10:12:00Z"));

    let wolf = &game.scores[0];
    assert_eq!(wolf.side(), Side::Werewolf);
    assert!(wolf.won);
    assert!((wolf.metrics.aggregate_score - 0.825).abs() < 1e-12);
    assert_eq!(wolf.elo_delta, None);

    let missing_fields = &game.scores[2];
    assert_eq!(missing_fields.team, "villagers");
    assert_eq!(missing_fields.role, "villager");
    assert!(!missing_fields.won);
    assert_eq!(missing_fields.metrics.aggregate_score, 0.0);
}

#[test]
fn test_reject_wrong_roster_size() {
    let mut payload = eight_player_game();
    payload["participants"]
        .as_object_mut()
        .unwrap()
        .remove("Player_8");

    let err = GameRecord::parse("short.json", &payload, ROSTER_SIZE).unwrap_err();
    assert!(matches!(
        err,
        GameError::RosterSize {
            found: 7,
            expected: 8
        }
    ));
    assert_eq!(err.to_string(), "has 7 participants, need 8");
}

#[test]
fn test_reject_missing_scores() {
    let mut payload = eight_player_game();
    payload["results"][1]["scores"] = json!([]);

    let err = GameRecord::parse("empty.json", &payload, ROSTER_SIZE).unwrap_err();
    assert!(matches!(err, GameError::MissingScores));

    payload["results"][1].as_object_mut().unwrap().remove("scores");
    let err = GameRecord::parse("none.json", &payload, ROSTER_SIZE).unwrap_err();
    assert!(matches!(err, GameError::MissingScores));
}

#[test]
fn test_reject_malformed_payload() {
    let payload = json!({ "participants": ["Player_1"], "results": [] });
    let err = GameRecord::parse("bad.json", &payload, ROSTER_SIZE).unwrap_err();
    assert!(matches!(err, GameError::Malformed(_)));
}

#[test]
fn test_roster_size_is_configurable() {
    let payload = json!({
        "participants": { "Player_1": "a", "Player_2": "b" },
        "results": [{ "scores": [{ "player_name": "Player_1", "team": "werewolves", "won": true }] }]
    });
    assert!(GameRecord::parse("duel.json", &payload, 2).is_ok());
    assert!(GameRecord::parse("duel.json", &payload, ROSTER_SIZE).is_err());
}

#[test]
fn test_no_timestamps() {
    let payload = json!({
        "participants": { "Player_1": "a" },
        "results": [{ "scores": [{ "player_name": "Player_1" }] }]
    });
    let game = GameRecord::parse("quiet.json", &payload, 1).unwrap();
    assert_eq!(game.start_time, None);
    assert_eq!(game.end_time, None);
}

#[test]
fn test_agent_lookup_skips_empty_mapping() {
    let mut payload = eight_player_game();
    payload["participants"]["Player_3"] = json!("");
    let game = GameRecord::parse("g.json", &payload, ROSTER_SIZE).unwrap();

    assert_eq!(game.agent_for("Player_1"), Some("wolf-a"));
    assert_eq!(game.agent_for("Player_3"), None);
    assert_eq!(game.agent_for("Player_9"), None);
}

#[test]
fn test_null_score_fields_fall_back_to_defaults() {
    let mut payload = eight_player_game();
    let wolf = &mut payload["results"][1]["scores"][0];
    wolf["role"] = Value::Null;
    wolf["won"] = Value::Null;
    wolf["team"] = Value::Null;
    wolf["metrics"]["aggregate_score"] = Value::Null;
    payload["results"][1]["scores"][1]["metrics"] = Value::Null;

    let game = GameRecord::parse("g.json", &payload, ROSTER_SIZE).unwrap();
    let wolf = &game.scores[0];
    assert_eq!(wolf.role, "");
    assert!(!wolf.won);
    assert_eq!(wolf.side(), Side::Villager);
    assert_eq!(wolf.metrics.aggregate_score, 0.0);
    assert_eq!(game.scores[1].metrics, Metrics::default());
}

#[test]
fn test_null_participant_counts_as_unmapped_slot() {
    let mut payload = eight_player_game();
    payload["participants"]["Player_3"] = Value::Null;

    let game = GameRecord::parse("g.json", &payload, ROSTER_SIZE).unwrap();
    assert_eq!(game.participants.len(), 8);
    assert_eq!(game.agent_for("Player_1"), Some("wolf-a"));
    assert_eq!(game.agent_for("Player_3"), None);

    let summary = GameSummary::from_payload("g.json", &payload).unwrap();
    assert_eq!(summary.participant_count, 8);
    assert!(!summary.participants.contains(&"vill-a".to_string()));
    assert_eq!(summary.participants.len(), 7);
}

#[test]
fn test_previous_annotations_are_read() {
    let mut payload = eight_player_game();
    payload["results"][1]["scores"][0]["elo_delta"] = json!(16.0);
    payload["results"][1]["scores"][0]["elo_after"] = json!(1016.0);

    let game = GameRecord::parse("g.json", &payload, ROSTER_SIZE).unwrap();
    assert_eq!(game.scores[0].elo_delta, Some(16.0));
    assert_eq!(game.scores[0].elo_after, Some(1016.0));
}

#[test]
fn test_summary_ignores_roster_validation() {
    let payload = json!({
        "participants": { "Player_1": "b-agent", "Player_2": "a-agent", "Player_3": "b-agent" },
        "results": [
            { "action_log": [{ "timestamp": "2025-01-02T00:00:00Z" }] },
            { "winner": "villagers" }
        ]
    });
    let summary = GameSummary::from_payload("odd.json", &payload).unwrap();

    assert_eq!(summary.participants, vec!["a-agent", "b-agent"]);
    assert_eq!(summary.participant_count, 3);
    assert_eq!(summary.winner, Some(json!("villagers")));
    assert_eq!(summary.start_time, summary.end_time);
}

#[test]
fn test_summary_winner_comes_from_first_block_with_the_key() {
    let payload = json!({
        "participants": { "Player_1": "a-agent" },
        "results": [
            { "action_log": [] },
            { "winner": null },
            { "winner": "werewolves" }
        ]
    });
    let summary = GameSummary::from_payload("g.json", &payload).unwrap();
    assert_eq!(summary.winner, None);
}

#[test]
fn test_annotate_scores_preserves_other_fields() {
    let mut payload = eight_player_game();
    let annotations = [
        ScoreAnnotation {
            index: 0,
            elo_delta: 16.0,
            elo_after: 1016.0,
        },
        ScoreAnnotation {
            index: 1,
            elo_delta: -16.0,
            elo_after: 984.0,
        },
    ];
    annotate_scores(&mut payload, 1, &annotations);

    let scores = &payload["results"][1]["scores"];
    assert_eq!(scores[0]["elo_delta"], json!(16.0));
    assert_eq!(scores[0]["elo_after"], json!(1016.0));
    assert_eq!(scores[1]["elo_after"], json!(984.0));
    assert_eq!(scores[0]["role"], json!("werewolf"));
    assert!(scores[2].get("elo_delta").is_none());

    let keys: Vec<&String> = scores[0].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        ["player_name", "team", "role", "won", "metrics", "elo_delta", "elo_after"]
    );
    assert_eq!(payload["results"][0]["phase"], json!("setup"));
}
