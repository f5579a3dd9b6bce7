//! Interactive actions and channel recommendations

use integration_tests::*;
use serde_json::json;
use trendbot_core::{InteractivePayload, Queue, TaskPayload, TopicMessage};
use trendbot_service::services::{messages, RecommendService};
use trendbot_service::{InteractiveService, ServiceError};

fn workspace() -> TestContext {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    t.slack.set_channels(vec![
        channel("C1", 40, true),
        channel("C2", 30, true),
        channel("C3", 20, false),
        channel("C4", 10, false),
    ]);
    t
}

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_publish_actions_skips_unknown_action() {
    let t = workspace();
    let payload = block_actions(
        TEAM_ID,
        "U1",
        json!([
            { "type": "channels_select", "action_id": "select_target_channel", "selected_channel": "C9" },
            { "type": "button", "action_id": "open_docs", "value": "x" },
        ]),
    );
    let payload = InteractivePayload::parse(&payload.to_string()).unwrap();

    let published = InteractiveService::new(&t.ctx)
        .publish_actions(&payload)
        .await
        .unwrap();

    assert_eq!(published, 1);
    assert_eq!(
        t.publisher.published(),
        vec![TopicMessage::SelectTargetChannel {
            team_id: TEAM_ID.to_string(),
            user_id: "U1".to_string(),
            channel_id: "C9".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_select_target_channel() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .select_target_channel(TEAM_ID, "U1", "C2")
        .await
        .unwrap();

    let stored = t.store.installation(TEAM_ID).unwrap();
    assert_eq!(stored.target_channel_id.as_deref(), Some("C2"));

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel, "C2");
    assert_eq!(posted[0].text, messages::target_channel_selected(BOT_USER));

    let views = t.slack.home_views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].0, "U1");
    assert_eq!(views[0].1["type"], "home");
}

#[tokio::test]
async fn test_select_target_channel_joins_before_posting() {
    let t = workspace();
    t.slack.enforce_membership();

    InteractiveService::new(&t.ctx)
        .select_target_channel(TEAM_ID, "U1", "C3")
        .await
        .unwrap();

    assert_eq!(t.slack.joined(), vec!["C3"]);
    let stored = t.store.installation(TEAM_ID).unwrap();
    assert_eq!(stored.target_channel_id.as_deref(), Some("C3"));
    assert_eq!(stored.joined_channel_ids, Some(strings(&["C1", "C2", "C3"])));

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel, "C3");
}

#[tokio::test]
async fn test_select_target_channel_keeps_old_target_when_join_fails() {
    let t = workspace();
    t.slack.enforce_membership();
    t.slack.fail_join("C4");

    let result = InteractiveService::new(&t.ctx)
        .select_target_channel(TEAM_ID, "U1", "C4")
        .await;

    assert!(result.is_err());
    let stored = t.store.installation(TEAM_ID).unwrap();
    assert_eq!(stored.target_channel_id.as_deref(), Some(TARGET_CHANNEL));
    assert!(t.slack.posted().is_empty());
}

#[tokio::test]
async fn test_join_channel_list_joins_and_leaves() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .join_channel_list(TEAM_ID, "U1", &strings(&["C2", "C3"]), now())
        .await
        .unwrap();

    // Joins are deferred to the join queue, leaves happen inline
    let tasks = t.tasks.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].0, now());
    match &tasks[0].1 {
        TaskPayload::JoinChannel(body) => assert_eq!(body.channel_ids, vec!["C3"]),
        other => panic!("unexpected task {other:?}"),
    }
    assert_eq!(t.slack.left(), vec!["C1"]);
    assert!(t.slack.joined().is_empty());

    let stored = t.store.installation(TEAM_ID).unwrap();
    assert_eq!(stored.joined_channel_ids, Some(strings(&["C2"])));
    assert!(!stored.is_all_public_channel);
    assert_eq!(t.slack.home_views().len(), 1);
}

#[tokio::test]
async fn test_join_channel_list_empty_selection_is_a_no_op() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .join_channel_list(TEAM_ID, "U1", &[], now())
        .await
        .unwrap();

    assert!(t.tasks.tasks().is_empty());
    assert!(t.slack.left().is_empty());
    assert!(t.slack.home_views().is_empty());
}

#[tokio::test]
async fn test_join_channel_list_batches_of_forty() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    let channels: Vec<_> = (0..85).map(|i| channel(&format!("C{i:03}"), 200 - i, false)).collect();
    let selected: Vec<String> = channels.iter().map(|c| c.id.clone()).collect();
    t.slack.set_channels(channels);

    InteractiveService::new(&t.ctx)
        .join_channel_list(TEAM_ID, "U1", &selected, now())
        .await
        .unwrap();

    let tasks = t.tasks.tasks();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|(_, task)| task.queue() == Queue::JoinChannel));
    assert_eq!(tasks[2].0, now() + chrono::Duration::minutes(4));
}

#[tokio::test]
async fn test_join_all_channel_enable() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .join_all_channel(TEAM_ID, "U1", true, now())
        .await
        .unwrap();

    let tasks = t.tasks.tasks();
    assert_eq!(tasks.len(), 1);
    match &tasks[0].1 {
        TaskPayload::JoinChannel(body) => assert_eq!(body.channel_ids, vec!["C3", "C4"]),
        other => panic!("unexpected task {other:?}"),
    }
    assert!(t.store.installation(TEAM_ID).unwrap().is_all_public_channel);
    assert_eq!(t.slack.home_views().len(), 1);
}

#[tokio::test]
async fn test_join_all_channel_disable_records_membership() {
    let t = workspace();
    let mut inst = installation(TEAM_ID);
    inst.is_all_public_channel = true;
    t.store.insert(inst);

    InteractiveService::new(&t.ctx)
        .join_all_channel(TEAM_ID, "U1", false, now())
        .await
        .unwrap();

    let stored = t.store.installation(TEAM_ID).unwrap();
    assert!(!stored.is_all_public_channel);
    assert_eq!(stored.joined_channel_ids, Some(strings(&["C1", "C2"])));
    assert!(t.tasks.tasks().is_empty());
}

#[tokio::test]
async fn test_select_trend_num() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .select_trend_num(TEAM_ID, "U1", 30)
        .await
        .unwrap();

    assert_eq!(t.store.installation(TEAM_ID).unwrap().selected_trend_num, 30);
    assert_eq!(t.slack.home_views().len(), 1);
}

#[tokio::test]
async fn test_select_trend_num_rejects_unlisted_value() {
    let t = workspace();

    let err = InteractiveService::new(&t.ctx)
        .select_trend_num(TEAM_ID, "U1", 7)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(t.store.installation(TEAM_ID).unwrap().selected_trend_num, 10);
    assert!(t.slack.home_views().is_empty());
}

#[tokio::test]
async fn test_join_channel_button_links_recommendation() {
    let t = workspace();

    InteractiveService::new(&t.ctx)
        .join_channel_button(TEAM_ID, TARGET_CHANNEL, "1710000000.000100", "C3")
        .await
        .unwrap();

    assert_eq!(t.slack.joined(), vec!["C3"]);
    let stored = t.store.installation(TEAM_ID).unwrap();
    assert_eq!(stored.joined_channel_ids, Some(strings(&["C1", "C2", "C3"])));

    let updates = t.slack.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].channel_id, TARGET_CHANNEL);
    assert_eq!(updates[0].ts, "1710000000.000100");
    assert_eq!(updates[0].text, messages::recommend_linked_text("C3"));
    assert_eq!(updates[0].blocks, Some(messages::recommend_linked_blocks("C3")));
}

#[tokio::test]
async fn test_action_for_unknown_team_is_not_configured() {
    let t = workspace();

    let err = InteractiveService::new(&t.ctx)
        .select_target_channel("TGONE", "U1", "C1")
        .await
        .unwrap_err();

    assert!(err.is_not_configured());
    assert!(t.slack.posted().is_empty());
}

// ============================================================================
// Recommendations
// ============================================================================

#[tokio::test]
async fn test_recommend_largest_unsuggested_channel() {
    let t = workspace();

    let first = RecommendService::new(&t.ctx).recommend(TEAM_ID).await.unwrap();
    let second = RecommendService::new(&t.ctx).recommend(TEAM_ID).await.unwrap();

    assert_eq!(first.as_deref(), Some("C3"));
    assert_eq!(second.as_deref(), Some("C4"));
    assert_eq!(t.store.recommended(TEAM_ID), strings(&["C3", "C4"]));

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].channel, TARGET_CHANNEL);
    assert_eq!(posted[0].text, messages::recommend_text("C3"));
    let blocks = posted[0].blocks.as_ref().unwrap();
    assert_eq!(blocks[0]["accessory"]["action_id"], "join_channel_button");
    assert_eq!(blocks[0]["accessory"]["value"], "C3");
}

#[tokio::test]
async fn test_recommend_resets_when_exhausted() {
    let t = workspace();
    t.store.set_recommended(TEAM_ID, strings(&["C3", "C4"]));

    let picked = RecommendService::new(&t.ctx).recommend(TEAM_ID).await.unwrap();

    assert_eq!(picked, None);
    assert!(t.store.recommended(TEAM_ID).is_empty());
    assert!(t.slack.posted().is_empty());

    // The next round starts over
    let picked = RecommendService::new(&t.ctx).recommend(TEAM_ID).await.unwrap();
    assert_eq!(picked.as_deref(), Some("C3"));
}

#[tokio::test]
async fn test_recommend_skipped_in_auto_join_all() {
    let t = workspace();
    let mut inst = installation(TEAM_ID);
    inst.is_all_public_channel = true;
    t.store.insert(inst);

    let picked = RecommendService::new(&t.ctx).recommend(TEAM_ID).await.unwrap();

    assert_eq!(picked, None);
    assert!(t.slack.posted().is_empty());
}
