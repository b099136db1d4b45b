//! Property-based tests for transition policy.

use esmaint_config::Rule;
use esmaint_lifecycle::{Transition, due_transitions};
use proptest::prelude::*;

fn threshold() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), 1i64..400]
}

fn rule() -> impl Strategy<Value = Rule> {
    (threshold(), threshold(), threshold(), threshold()).prop_map(|(warm, r#move, cold, delete)| {
        Rule {
            warm,
            r#move,
            cold,
            delete,
        }
    })
}

proptest! {
    #[test]
    fn due_transitions_are_sorted_and_unique(rule in rule(), age in -10i64..800) {
        let due = due_transitions(&rule, age);
        prop_assert!(due.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn delete_is_exclusive(rule in rule(), age in -10i64..800) {
        let due = due_transitions(&rule, age);
        if due.contains(&Transition::Delete) {
            prop_assert_eq!(due, vec![Transition::Delete]);
        }
    }

    #[test]
    fn due_matches_thresholds(rule in rule(), age in -10i64..800) {
        let due = due_transitions(&rule, age);
        let delete_due = rule.delete != 0 && age >= rule.delete;
        for transition in Transition::ALL {
            let threshold = transition.threshold(&rule);
            let expected = threshold != 0
                && age >= threshold
                && (transition == Transition::Delete || !delete_due);
            prop_assert_eq!(due.contains(&transition), expected, "{}", transition);
        }
    }

    #[test]
    fn due_set_grows_with_age(rule in rule(), age in 0i64..400, extra in 0i64..400) {
        prop_assume!(rule.delete == 0 || age + extra < rule.delete);
        let younger = due_transitions(&rule, age);
        let older = due_transitions(&rule, age + extra);
        prop_assert!(younger.iter().all(|t| older.contains(t)));
    }
}
