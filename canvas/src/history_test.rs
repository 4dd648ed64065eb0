use super::*;
use crate::camera::Point;

fn ball_at(x: f64) -> Element {
    Element::ball(Point::new(x, 0.0))
}

/// Build a history by pushing `n` successive single-element additions.
fn history_with_pushes(n: usize) -> (History, Vec<Vec<Element>>) {
    let mut history = History::default();
    let mut snapshots = vec![history.present().to_vec()];
    for i in 0..n {
        let mut next = history.present().to_vec();
        #[allow(clippy::cast_precision_loss)]
        next.push(ball_at(i as f64));
        history.push(next);
        snapshots.push(history.present().to_vec());
    }
    (history, snapshots)
}

// =============================================================
// push
// =============================================================

#[test]
fn push_moves_present_to_past() {
    let mut history = History::default();
    let first = vec![ball_at(1.0)];
    history.push(first.clone());
    assert_eq!(history.present(), first.as_slice());
    assert_eq!(history.past_len(), 1);
    assert!(history.can_undo());
}

#[test]
fn push_clears_future() {
    let (mut history, _) = history_with_pushes(3);
    history.undo();
    history.undo();
    assert_eq!(history.future_len(), 2);
    history.push(vec![ball_at(99.0)]);
    assert_eq!(history.future_len(), 0);
    assert!(!history.redo());
}

// =============================================================
// undo / redo
// =============================================================

#[test]
fn undo_on_empty_past_is_noop() {
    let mut history = History::new(vec![ball_at(1.0)]);
    let before = history.clone();
    assert!(!history.undo());
    assert_eq!(history, before);
}

#[test]
fn redo_on_empty_future_is_noop() {
    let (mut history, _) = history_with_pushes(2);
    let before = history.clone();
    assert!(!history.redo());
    assert_eq!(history, before);
}

#[test]
fn undo_restores_previous_snapshot() {
    let (mut history, snapshots) = history_with_pushes(3);
    assert!(history.undo());
    assert_eq!(history.present(), snapshots[2].as_slice());
    assert!(history.undo());
    assert_eq!(history.present(), snapshots[1].as_slice());
}

#[test]
fn undo_then_redo_round_trips_for_every_depth() {
    let pushes = 6;
    for k in 0..=pushes {
        let (mut history, snapshots) = history_with_pushes(pushes);
        for _ in 0..k {
            assert!(history.undo());
        }
        assert_eq!(history.present(), snapshots[pushes - k].as_slice());
        for _ in 0..k {
            assert!(history.redo());
        }
        assert_eq!(history.present(), snapshots[pushes].as_slice(), "k = {k}");
    }
}

#[test]
fn stack_size_is_conserved_across_undo_and_redo() {
    let (mut history, _) = history_with_pushes(5);
    let total = |h: &History| h.past_len() + 1 + h.future_len();
    let expected = total(&history);
    for op in [true, true, false, true, true, true, true, false, false] {
        if op {
            history.undo();
        } else {
            history.redo();
        }
        assert_eq!(total(&history), expected);
    }
}

// =============================================================
// reset
// =============================================================

#[test]
fn reset_drops_both_stacks() {
    let (mut history, _) = history_with_pushes(3);
    history.undo();
    history.reset(vec![ball_at(7.0)]);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.present().len(), 1);
}
