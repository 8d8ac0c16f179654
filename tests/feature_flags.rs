use taskdeck::flags::{EnvSnapshot, Environment, FeatureFlags, Flag, Resolution};

fn flags(pairs: &[(&str, &str)]) -> FeatureFlags {
    FeatureFlags::new(EnvSnapshot::from_pairs(pairs.iter().copied()))
}

#[test]
fn inline_edit_is_off_in_production_by_default() {
    let f = flags(&[]);
    assert!(!f.is_enabled(Flag::TaskInlineEdit, Some(Environment::Production)));
    assert!(!f.is_enabled_by_name("taskInlineEdit", Some(Environment::Production)));
}

#[test]
fn override_wins_in_every_environment() {
    let f = flags(&[("FEATURE_TASK_INLINE_EDIT", "1")]);
    for env in Environment::ALL {
        assert!(f.is_enabled(Flag::TaskInlineEdit, Some(env)), "{env}");
    }

    let off = flags(&[("NEXT_PUBLIC_FEATURE_TASK_INLINE_EDIT", " Disabled ")]);
    for env in Environment::ALL {
        assert!(!off.is_enabled(Flag::TaskInlineEdit, Some(env)), "{env}");
    }
}

#[test]
fn inline_edit_is_on_in_development() {
    let f = flags(&[]);
    assert!(f.is_enabled(Flag::TaskInlineEdit, Some(Environment::Development)));
    // The default environment is development too.
    assert!(f.is_enabled(Flag::TaskInlineEdit, None));
}

#[test]
fn unparseable_override_falls_through() {
    let f = flags(&[("FEATURE_TASK_INLINE_EDIT", "definitely")]);
    assert_eq!(
        f.explain(Flag::TaskInlineEdit, Some(Environment::Preview)),
        Resolution::Environment { environment: Environment::Preview, value: true }
    );
    assert_eq!(
        f.explain(Flag::TaskInlineEdit, Some(Environment::Production)),
        Resolution::Default { value: false }
    );
}

#[test]
fn resolve_all_uses_the_detected_environment() {
    let f = flags(&[("VERCEL_ENV", "production"), ("FEATURE_TASK_BOARD_DND", "no")]);
    assert_eq!(f.environment(), Environment::Production);

    let all = f.resolve_all(None);
    assert_eq!(all.len(), Flag::ALL.len());
    assert_eq!(all[&Flag::TaskInlineEdit], false);
    assert_eq!(all[&Flag::TaskBoardDragDrop], false);
    assert_eq!(all[&Flag::AiTaskDrafts], false);

    let dev = f.resolve_all(Some(Environment::Development));
    assert_eq!(dev[&Flag::AiTaskDrafts], true);
}
