use super::*;
use serde_json::json;

#[test]
fn test_new_agent_defaults() {
    let agent = AgentState::default();
    assert_eq!(agent.general_elo, INITIAL_RATING);
    assert_eq!(agent.werewolf_elo, INITIAL_RATING);
    assert_eq!(agent.villager_elo, INITIAL_RATING);
    assert_eq!(agent.games_played, 0);
    assert_eq!(agent.win_rate(), 0.0);
}

#[test]
fn test_record_game_keeps_counters_consistent() {
    let mut agent = AgentState::default();
    agent.record_game(Side::Werewolf, true);
    agent.record_game(Side::Villager, false);
    agent.record_game(Side::Villager, true);

    assert_eq!(agent.games_played, 3);
    assert_eq!(agent.wins + agent.losses, agent.games_played);
    assert_eq!(
        agent.games_as_werewolf + agent.games_as_villager,
        agent.games_played
    );
    assert_eq!(agent.wins_as_werewolf, 1);
    assert_eq!(agent.wins_as_villager, 1);
    assert_eq!(agent.win_rate(), 66.7);
}

#[test]
fn test_partial_agent_document_fills_defaults() {
    let agent: AgentState = serde_json::from_value(json!({
        "general_elo": 1042.5,
        "games_played": 2,
        "wins": 2
    }))
    .unwrap();

    assert_eq!(agent.general_elo, 1042.5);
    assert_eq!(agent.werewolf_elo, INITIAL_RATING);
    assert_eq!(agent.losses, 0);
}

#[test]
fn test_state_document_round_trip_shape() {
    let mut state = EloState::new();
    state.agent_mut("agent/one").record_game(Side::Villager, true);
    assert!(state.mark_processed("game_1.json"));
    assert!(!state.mark_processed("game_1.json"));

    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["processed_games"], json!(["game_1.json"]));
    assert_eq!(value["agents"]["agent/one"]["games_as_villager"], json!(1));
    assert_eq!(value["last_updated"], json!(null));

    let loaded: EloState = serde_json::from_value(value).unwrap();
    assert_eq!(loaded, state);
}

#[test]
fn test_empty_document_is_empty_state() {
    let state: EloState = serde_json::from_value(json!({})).unwrap();
    assert_eq!(state, EloState::new());
    assert_eq!(state.general_elo("nobody"), INITIAL_RATING);
    assert!(!state.is_processed("game_1.json"));
}
