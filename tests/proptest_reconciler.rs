//! Property-based tests for gemini-wrapped using proptest

use chrono::{TimeZone, Utc};
use gemini_wrapped::{
    pricing::CostCalculator,
    reconciler::reconcile,
    types::{
        CanonicalSession, ISOTimestamp, Message, MessageId, MessageRole, ModelName, ProjectHash,
        RawSessionSnapshot, SessionId, TokenUsage,
    },
};
use proptest::prelude::*;

// Strategies for generating test data

prop_compose! {
    fn arb_token_usage()(
        input in 0u64..10_000_000,
        output in 0u64..5_000_000,
        cached in 0u64..1_000_000,
        thoughts in 0u64..500_000,
    ) -> TokenUsage {
        TokenUsage::new(input, output, cached, thoughts)
    }
}

prop_compose! {
    fn arb_message_seed()(
        role in prop::sample::select(vec![MessageRole::User, MessageRole::Assistant]),
        tokens in prop::option::of(arb_token_usage()),
        minute_offset in 0i64..30,
    ) -> (MessageRole, Option<TokenUsage>, i64) {
        (role, tokens, minute_offset)
    }
}

fn arb_messages() -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message_seed(), 1..8).prop_map(|seeds| {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        seeds
            .into_iter()
            .enumerate()
            .map(|(index, (role, tokens, minute_offset))| Message {
                // Strictly increasing timestamps keep ordering unambiguous
                id: MessageId::new(format!("m{index}")),
                timestamp: Some(ISOTimestamp::new(
                    base + chrono::Duration::minutes(index as i64 * 30 + minute_offset),
                )),
                role,
                content: format!("content-{index}"),
                model: (role == MessageRole::Assistant)
                    .then(|| ModelName::new("gemini-2.5-pro")),
                tokens: if role == MessageRole::Assistant { tokens } else { None },
                tool_calls: None,
            })
            .collect()
    })
}

/// Build overlapping snapshots of one logical session the way Gemini CLI
/// produces them: an early write with metadata not yet attached, the full
/// log, and a prefix segment.
fn snapshots_for(messages: &[Message]) -> Vec<RawSessionSnapshot> {
    let start = ISOTimestamp::new(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());

    let stripped: Vec<Message> = messages
        .iter()
        .cloned()
        .map(|mut m| {
            m.tokens = None;
            m.tool_calls = None;
            m
        })
        .collect();

    let prefix_len = messages.len().div_ceil(2);

    let snapshot = |updated_minute: u32, msgs: Vec<Message>| RawSessionSnapshot {
        session_id: SessionId::new("s1"),
        project_hash: ProjectHash::new("p1"),
        start_time: start,
        last_updated: ISOTimestamp::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, updated_minute, 0).unwrap(),
        ),
        messages: msgs,
    };

    vec![
        snapshot(0, stripped),
        snapshot(10, messages.to_vec()),
        snapshot(5, messages[..prefix_len].to_vec()),
    ]
}

fn canonical_fingerprint(session: &CanonicalSession) -> (Vec<Message>, ISOTimestamp, ISOTimestamp) {
    (
        session.messages.clone(),
        session.start_time,
        session.last_updated,
    )
}

proptest! {
    #[test]
    fn merge_is_order_insensitive(messages in arb_messages()) {
        let snapshots = snapshots_for(&messages);
        let baseline = reconcile(snapshots.clone());
        prop_assert_eq!(baseline.len(), 1);
        let expected = canonical_fingerprint(&baseline[0]);

        // Every ordering of the snapshots yields the identical canonical session
        let orders = [
            [0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0],
        ];
        for order in orders {
            let permuted: Vec<_> = order.iter().map(|&i| snapshots[i].clone()).collect();
            let merged = reconcile(permuted);
            prop_assert_eq!(canonical_fingerprint(&merged[0]), expected.clone());
        }
    }

    #[test]
    fn merge_is_idempotent_under_replay(messages in arb_messages()) {
        let snapshots = snapshots_for(&messages);
        let once = reconcile(snapshots.clone());

        let mut doubled = snapshots.clone();
        doubled.extend(snapshots);
        let twice = reconcile(doubled);

        prop_assert_eq!(
            canonical_fingerprint(&once[0]),
            canonical_fingerprint(&twice[0])
        );
    }

    #[test]
    fn merge_never_duplicates_or_drops_ids(messages in arb_messages()) {
        let expected_ids: std::collections::BTreeSet<_> =
            messages.iter().map(|m| m.id.clone()).collect();

        let merged = reconcile(snapshots_for(&messages));
        let merged_ids: std::collections::BTreeSet<_> =
            merged[0].messages.iter().map(|m| m.id.clone()).collect();

        prop_assert_eq!(merged[0].messages.len(), expected_ids.len());
        prop_assert_eq!(merged_ids, expected_ids);
    }

    #[test]
    fn merged_messages_are_timestamp_ordered(messages in arb_messages()) {
        let merged = reconcile(snapshots_for(&messages));
        let timestamps: Vec<_> = merged[0]
            .messages
            .iter()
            .filter_map(|m| m.timestamp)
            .collect();
        prop_assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn metadata_survives_regardless_of_snapshot_order(messages in arb_messages()) {
        let snapshots = snapshots_for(&messages);
        let mut reversed = snapshots.clone();
        reversed.reverse();

        for merged in [reconcile(snapshots), reconcile(reversed)] {
            for original in &messages {
                if original.tokens.is_some() {
                    let survived = merged[0]
                        .messages
                        .iter()
                        .find(|m| m.id == original.id)
                        .unwrap();
                    prop_assert_eq!(survived.tokens, original.tokens);
                }
            }
        }
    }

    #[test]
    fn cost_is_never_negative_or_nan(
        input in 0u64..100_000_000,
        output in 0u64..100_000_000,
        cached in 0u64..100_000_000,
        model in prop::sample::select(vec![
            "gemini-3-pro",
            "gemini-2.5-pro",
            "gemini-2.5-flash",
            "gemini-2.5-flash-lite",
            "totally-unknown-model",
        ]),
    ) {
        let cost = CostCalculator::new().calculate(&ModelName::new(model), input, output, cached);
        prop_assert!(cost >= 0.0);
        prop_assert!(cost.is_finite());
    }

    #[test]
    fn cost_is_monotonic_in_output(
        input in 0u64..1_000_000,
        output in 0u64..1_000_000,
        extra in 0u64..1_000_000,
    ) {
        let calculator = CostCalculator::new();
        let model = ModelName::new("gemini-2.5-pro");
        let base = calculator.calculate(&model, input, output, 0);
        let more = calculator.calculate(&model, input, output + extra, 0);
        prop_assert!(more >= base);
    }
}
