//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::repo::PullOutput;
use crate::tasks::{RestartOutcome, Task};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new("Bot")
}

fn replies(effects: &[Effect]) -> Vec<&Reply> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Reply(reply) => Some(reply),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]{1,8}", "[a-z]{1,5}Bot", "Bot[a-z]{0,3}"]
}

fn arb_command() -> impl Strategy<Value = String> {
    prop_oneof![
        // interpreter + path
        (
            "(python3|node|bash)",
            proptest::collection::vec(arb_segment(), 1..5),
            "[a-z]{1,6}\\.(py|js|sh)"
        )
            .prop_map(|(interp, dirs, file)| format!("{interp} /{}/{file}", dirs.join("/"))),
        // no path at all
        "[a-zA-Z ]{0,20}",
    ]
}

fn arb_task() -> impl Strategy<Value = Task> {
    (0i64..1000, arb_command()).prop_map(|(id, command)| Task::new(id, command))
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(arb_task(), 0..8)
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(CANCEL.to_string()),
        Just(RESTART.to_string()),
        Just(UPLOAD.to_string()),
        Just("restart".to_string()),
        "[a-zA-Z ]{0,12}",
        "[a-z]{1,5}Bot",
    ]
}

/// Any reachable state, built by replaying a listing and a selection
fn arb_state() -> impl Strategy<Value = ConvState> {
    (arb_tasks(), any::<bool>(), any::<prop::sample::Index>()).prop_map(|(tasks, select, pick)| {
        let ctx = test_context();
        let listed = transition(&ConvState::Idle, &ctx, Event::TasksListed { tasks: Some(tasks) })
            .unwrap()
            .new_state;
        let Some(inventory) = listed.inventory() else {
            return listed;
        };
        if !select {
            return listed;
        }
        let names: Vec<String> = inventory.names().map(str::to_string).collect();
        let name = pick.get(&names).clone();
        transition(&listed, &ctx, Event::user_text(name)).unwrap().new_state
    })
}

fn arb_terminal_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::user_text(CANCEL)),
        Just(Event::RestartCompleted { outcome: RestartOutcome::Restarted }),
        Just(Event::RestartCompleted { outcome: RestartOutcome::Failed }),
        "[a-z .]{0,20}".prop_map(|s| Event::PullCompleted { output: PullOutput(s) }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn listing_only_offers_marker_tasks(tasks in arb_tasks()) {
        let result = transition(
            &ConvState::Idle,
            &test_context(),
            Event::TasksListed { tasks: Some(tasks.clone()) },
        ).unwrap();

        if let Some(inventory) = result.new_state.inventory() {
            for name in inventory.names() {
                let task = inventory.get(name).unwrap();
                prop_assert!(task.command.contains("Bot"));
                prop_assert_eq!(task.command.rsplit('/').nth(1), Some(name));
            }
            // every marker task with a name is represented
            for task in tasks.iter().filter(|t| t.command.contains("Bot")) {
                if let Some(name) = task.display_name() {
                    prop_assert!(inventory.get(name).is_some());
                }
            }
        }
    }

    #[test]
    fn empty_listing_never_awaits_selection(
        tasks in prop_oneof![Just(None::<Vec<Task>>), Just(Some(Vec::<Task>::new()))],
    ) {
        let result = transition(&ConvState::Idle, &test_context(), Event::TasksListed { tasks }).unwrap();
        prop_assert!(result.new_state.is_idle());
        prop_assert_eq!(replies(&result.effects)[0].text.as_str(), NO_TASKS_MESSAGE);
    }

    #[test]
    fn unknown_selection_resets(tasks in arb_tasks(), text in arb_text()) {
        let ctx = test_context();
        let listed = transition(&ConvState::Idle, &ctx, Event::TasksListed { tasks: Some(tasks) })
            .unwrap()
            .new_state;
        let Some(inventory) = listed.inventory() else {
            return Ok(());
        };
        prop_assume!(inventory.get(&text).is_none());

        let result = transition(&listed, &ctx, Event::user_text(text)).unwrap();
        prop_assert!(result.new_state.is_idle());
        prop_assert!(result.new_state.inventory().is_none());
        prop_assert!(result.new_state.selection().is_none());
    }

    #[test]
    fn terminal_events_clear_selection(state in arb_state(), event in arb_terminal_event()) {
        if let Ok(result) = transition(&state, &test_context(), event) {
            prop_assert!(result.new_state.is_idle());
            prop_assert!(result.new_state.selection().is_none());
            prop_assert!(result.new_state.inventory().is_none());
        }
    }

    #[test]
    fn cancel_always_replies_ok(state in arb_state()) {
        let result = transition(&state, &test_context(), Event::user_text(CANCEL)).unwrap();
        prop_assert!(result.new_state.is_idle());
        let replies = replies(&result.effects);
        prop_assert_eq!(replies.len(), 1);
        prop_assert_eq!(replies[0].text.as_str(), CANCELLED_MESSAGE);
        prop_assert_eq!(&replies[0].keyboard, &Keyboard::Remove);
    }

    #[test]
    fn user_text_is_always_handled(state in arb_state(), text in arb_text()) {
        prop_assert!(transition(&state, &test_context(), Event::user_text(text)).is_ok());
    }

    #[test]
    fn selection_matches_inventory(state in arb_state()) {
        if let Some(selection) = state.selection() {
            let inventory = state.inventory().unwrap();
            let task = inventory.get(&selection.task_name).unwrap();
            prop_assert_eq!(task.id, selection.task_id);
        }
    }
}
