//! Hourly announcements, digests and dedupe pruning

use chrono::Duration;
use integration_tests::*;
use trendbot_core::events::{ChannelBatchBody, TeamBody};
use trendbot_core::{PostedMessage, Reaction, TrendMessage, TrendPeriod};
use trendbot_service::services::{messages, TrendService};

fn batch(channel_ids: &[&str]) -> ChannelBatchBody {
    ChannelBatchBody {
        team_id: TEAM_ID.to_string(),
        channel_ids: channel_ids.iter().map(ToString::to_string).collect(),
    }
}

fn seeded() -> TestContext {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    t.slack.set_history(
        "C1",
        vec![message(600, "eyes", 8), message(500, "fire", 12)],
    );
    t.slack.set_history("C2", vec![message(400, "tada", 15), message(300, "+1", 3)]);
    t
}

#[tokio::test]
async fn test_post_trend_message_announces_top_message() {
    let t = seeded();

    let announced = TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1", "C2"]), now())
        .await
        .unwrap();
    assert_eq!(announced, 1);

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 2);
    assert!(posted.iter().all(|m| m.channel == TARGET_CHANNEL));
    assert_eq!(posted[0].text, messages::TREND_INTRO);

    let top = message(400, "tada", 15);
    let permalink = format!(
        "https://example.slack.com/archives/C2/p{}",
        top.ts.as_str().replace('.', "")
    );
    assert_eq!(
        posted[1].text,
        messages::trend_item("C2", &[Reaction::new("tada", 15)], &permalink)
    );
    assert_eq!(t.store.posted(TEAM_ID), vec![PostedMessage::new("C2", top.ts)]);
}

#[tokio::test]
async fn test_post_trend_message_reads_two_days_of_history() {
    let t = seeded();

    TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1", "C2"]), now())
        .await
        .unwrap();

    let requests = t.slack.history_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], ("C1".to_string(), now() - Duration::days(2)));
    assert_eq!(requests[1].0, "C2");
}

#[tokio::test]
async fn test_post_trend_message_skips_already_posted() {
    let t = seeded();
    let earlier = PostedMessage::new("C9", ts("1700000000.000100"));
    t.store.set_posted(
        TEAM_ID,
        vec![earlier.clone(), PostedMessage::new("C2", message(400, "tada", 15).ts)],
    );

    TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1", "C2"]), now())
        .await
        .unwrap();

    // C1's 12-reaction message is the best one not yet announced
    let texts = t.slack.posted_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].starts_with(":tada: <#C1> is buzzing!"));

    let posted = t.store.posted(TEAM_ID);
    assert_eq!(posted.len(), 3);
    assert_eq!(posted[0], earlier);
    assert_eq!(posted[2], PostedMessage::new("C1", message(500, "fire", 12).ts));
}

#[tokio::test]
async fn test_post_trend_message_respects_threshold() {
    let t = seeded();
    let mut inst = installation(TEAM_ID);
    inst.selected_trend_num = 20;
    t.store.insert(inst);

    let announced = TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1", "C2"]), now())
        .await
        .unwrap();

    assert_eq!(announced, 0);
    assert!(t.slack.posted().is_empty());
    assert!(t.store.posted(TEAM_ID).is_empty());
}

#[tokio::test]
async fn test_permalink_failure_posts_nothing() {
    let t = seeded();
    t.slack.fail_permalink("C2");

    let result = TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1", "C2"]), now())
        .await;

    assert!(result.is_err());
    assert!(t.slack.posted().is_empty());
    assert!(t.store.posted(TEAM_ID).is_empty());
}

#[tokio::test]
async fn test_post_trend_message_without_target_is_not_configured() {
    let t = seeded();
    t.store.insert(unconfigured_installation(TEAM_ID));

    let err = TrendService::new(&t.ctx)
        .post_trend_message(&batch(&["C1"]), now())
        .await
        .unwrap_err();

    assert!(err.is_not_configured());
    assert!(t.slack.history_requests().is_empty());
}

#[tokio::test]
async fn test_count_trend_accumulates_top_reacted() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    t.slack.set_history(
        "C1",
        vec![
            message(100, "eyes", 1),
            message(200, "fire", 4),
            message(300, "tada", 2),
            message(400, "+1", 9),
            trendbot_core::HistoryMessage::new(ts("1710490000.000100"), Vec::new()),
        ],
    );

    let counted = TrendService::new(&t.ctx)
        .count_trend(TrendPeriod::Weekly, &batch(&["C1"]), now())
        .await
        .unwrap();
    assert_eq!(counted, 3);

    let accumulated = t.store.accumulated(TEAM_ID, TrendPeriod::Weekly);
    let counts: Vec<u32> = accumulated.iter().map(|m| m.reaction_count).collect();
    assert_eq!(counts, vec![9, 4, 2]);
    assert!(t.store.accumulated(TEAM_ID, TrendPeriod::Monthly).is_empty());

    let requests = t.slack.history_requests();
    assert_eq!(requests[0].1, now() - Duration::days(7));
}

#[tokio::test]
async fn test_redelivered_count_does_not_repeat_digest_entries() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    t.slack.set_history("C1", vec![message(200, "fire", 4), message(400, "+1", 9)]);
    let service = TrendService::new(&t.ctx);

    service
        .count_trend(TrendPeriod::Weekly, &batch(&["C1"]), now())
        .await
        .unwrap();
    service
        .count_trend(TrendPeriod::Weekly, &batch(&["C1"]), now())
        .await
        .unwrap();
    assert_eq!(t.store.accumulated(TEAM_ID, TrendPeriod::Weekly).len(), 2);

    let announced = service
        .post_digest(TrendPeriod::Weekly, &TeamBody { team_id: TEAM_ID.to_string() })
        .await
        .unwrap();
    assert_eq!(announced, 2);
    let texts = t.slack.posted_texts();
    assert_eq!(texts.len(), 3);
    assert_ne!(texts[1], texts[2]);
}

#[tokio::test]
async fn test_digest_posts_repeated_accumulator_entry_once() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    let entry = TrendMessage::new("C1", ts("1710400000.000100"), vec![Reaction::new("tada", 6)]);
    t.store.set_accumulated(
        TEAM_ID,
        TrendPeriod::Monthly,
        vec![entry.clone(), entry, TrendMessage::new("C2", ts("1710410000.000100"), vec![Reaction::new("eyes", 2)])],
    );

    let announced = TrendService::new(&t.ctx)
        .post_digest(TrendPeriod::Monthly, &TeamBody { team_id: TEAM_ID.to_string() })
        .await
        .unwrap();

    assert_eq!(announced, 2);
    let texts = t.slack.posted_texts();
    assert!(texts[1].contains("/archives/C1/"));
    assert!(texts[2].contains("/archives/C2/"));
}

#[tokio::test]
async fn test_count_trend_monthly_looks_back_one_month() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    TrendService::new(&t.ctx)
        .count_trend(TrendPeriod::Monthly, &batch(&["C1"]), now())
        .await
        .unwrap();

    let requests = t.slack.history_requests();
    assert_eq!(requests[0].1.to_rfc3339(), "2024-02-15T09:00:00+00:00");
}

#[tokio::test]
async fn test_post_digest_announces_best_and_clears() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    let accumulated: Vec<TrendMessage> = [3, 11, 7, 2, 11]
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            TrendMessage::new(
                format!("C{i}"),
                ts(&format!("17104{i}0000.000100")),
                vec![Reaction::new("tada", count)],
            )
        })
        .collect();
    t.store.set_accumulated(TEAM_ID, TrendPeriod::Weekly, accumulated);

    let announced = TrendService::new(&t.ctx)
        .post_digest(TrendPeriod::Weekly, &TeamBody { team_id: TEAM_ID.to_string() })
        .await
        .unwrap();
    assert_eq!(announced, 3);

    let texts = t.slack.posted_texts();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0], messages::digest_intro(TrendPeriod::Weekly, 3));
    // Ties keep accumulation order
    assert!(texts[1].contains("/archives/C1/"));
    assert!(texts[2].contains("/archives/C4/"));
    assert!(texts[3].contains("/archives/C2/"));
    assert!(t.store.accumulated(TEAM_ID, TrendPeriod::Weekly).is_empty());
}

#[tokio::test]
async fn test_post_digest_with_nothing_accumulated() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    let announced = TrendService::new(&t.ctx)
        .post_digest(TrendPeriod::Monthly, &TeamBody { team_id: TEAM_ID.to_string() })
        .await
        .unwrap();

    assert_eq!(announced, 0);
    assert!(t.slack.posted().is_empty());
}

#[tokio::test]
async fn test_prune_posted_drops_entries_past_horizon() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    let old = now() - Duration::days(70);
    let recent = now() - Duration::days(10);
    t.store.set_posted(
        TEAM_ID,
        vec![
            PostedMessage::new("C1", ts(&format!("{}.000100", old.timestamp()))),
            PostedMessage::new("C2", ts(&format!("{}.000100", recent.timestamp()))),
        ],
    );

    let removed = TrendService::new(&t.ctx)
        .prune_posted(TEAM_ID, now())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    let kept = t.store.posted(TEAM_ID);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].channel_id, "C2");
}
