//! Events API handling

use integration_tests::*;
use trendbot_core::events::{CreatedChannel, EmojiSubtype};
use trendbot_core::{PostedMessage, SlackEvent, TrendMessage, TrendPeriod};
use trendbot_service::services::messages;
use trendbot_service::EventService;

fn created(id: &str) -> SlackEvent {
    SlackEvent::ChannelCreated {
        channel: CreatedChannel {
            id: id.to_string(),
            name: "new-channel".to_string(),
        },
    }
}

fn emoji(subtype: EmojiSubtype, name: Option<&str>, value: Option<&str>) -> SlackEvent {
    SlackEvent::EmojiChanged {
        subtype,
        name: name.map(String::from),
        value: value.map(String::from),
    }
}

#[tokio::test]
async fn test_app_home_opened_publishes_view() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    EventService::new(&t.ctx)
        .handle(
            TEAM_ID,
            &SlackEvent::AppHomeOpened {
                user: "U7".to_string(),
                tab: Some("home".to_string()),
            },
        )
        .await
        .unwrap();

    let views = t.slack.home_views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].0, "U7");
}

#[tokio::test]
async fn test_channel_created_announces_in_target() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    EventService::new(&t.ctx).handle(TEAM_ID, &created("CNEW")).await.unwrap();

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel, TARGET_CHANNEL);
    assert_eq!(posted[0].text, messages::channel_created("CNEW"));
    assert!(t.slack.joined().is_empty());
}

#[tokio::test]
async fn test_channel_created_joins_in_auto_join_all() {
    let t = TestContext::new();
    let mut inst = installation(TEAM_ID);
    inst.is_all_public_channel = true;
    t.store.insert(inst);

    EventService::new(&t.ctx).handle(TEAM_ID, &created("CNEW")).await.unwrap();

    assert_eq!(t.slack.joined(), vec!["CNEW"]);
    assert_eq!(t.slack.posted().len(), 1);
}

#[tokio::test]
async fn test_channel_created_without_target_posts_nothing() {
    let t = TestContext::new();
    t.store.insert(unconfigured_installation(TEAM_ID));

    EventService::new(&t.ctx).handle(TEAM_ID, &created("CNEW")).await.unwrap();

    assert!(t.slack.posted().is_empty());
}

#[tokio::test]
async fn test_emoji_added_with_image() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    let url = "https://emoji.slack-edge.com/T0001/partyparrot/abc.gif";

    EventService::new(&t.ctx)
        .handle(TEAM_ID, &emoji(EmojiSubtype::Add, Some("partyparrot"), Some(url)))
        .await
        .unwrap();

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel, TARGET_CHANNEL);
    assert_eq!(posted[0].text, messages::emoji_added("partyparrot"));
    assert_eq!(posted[0].attachments, messages::emoji_attachments(url));
}

#[tokio::test]
async fn test_emoji_alias_has_no_attachment() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    EventService::new(&t.ctx)
        .handle(TEAM_ID, &emoji(EmojiSubtype::Add, Some("yes"), Some("alias:thumbsup")))
        .await
        .unwrap();

    let posted = t.slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].attachments, None);
}

#[tokio::test]
async fn test_emoji_removed_is_ignored() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));

    EventService::new(&t.ctx)
        .handle(TEAM_ID, &emoji(EmojiSubtype::Remove, None, None))
        .await
        .unwrap();

    assert!(t.slack.posted().is_empty());
}

#[tokio::test]
async fn test_uninstall_removes_workspace_data() {
    let t = TestContext::new();
    t.store.insert(installation(TEAM_ID));
    t.store.insert(installation("TOTHER"));
    t.store.set_posted(TEAM_ID, vec![PostedMessage::new("C1", ts("1.0"))]);
    t.store.set_recommended(TEAM_ID, vec!["C2".to_string()]);
    t.store.set_accumulated(
        TEAM_ID,
        TrendPeriod::Monthly,
        vec![TrendMessage::new("C1", ts("1.0"), Vec::new())],
    );

    EventService::new(&t.ctx)
        .handle(TEAM_ID, &SlackEvent::AppUninstalled)
        .await
        .unwrap();

    assert!(t.store.installation(TEAM_ID).is_none());
    assert!(t.store.posted(TEAM_ID).is_empty());
    assert!(t.store.recommended(TEAM_ID).is_empty());
    assert!(t.store.accumulated(TEAM_ID, TrendPeriod::Monthly).is_empty());
    assert!(t.store.installation("TOTHER").is_some());
}

#[tokio::test]
async fn test_tokens_revoked_for_unknown_team_succeeds() {
    let t = TestContext::new();

    EventService::new(&t.ctx)
        .handle("TGONE", &SlackEvent::TokensRevoked)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_event_for_unknown_team_is_not_configured() {
    let t = TestContext::new();

    let err = EventService::new(&t.ctx)
        .handle("TGONE", &created("CNEW"))
        .await
        .unwrap_err();

    assert!(err.is_not_configured());
}
