use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::env::Environment;

/// Every feature flag the application knows about.
///
/// Adding a flag means adding a variant here and an arm in
/// [`Flag::definition`]; the match makes a forgotten definition a compile
/// error.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Flag {
    TaskInlineEdit,
    TaskBoardDragDrop,
    AiTaskDrafts,
}

/// How one flag resolves when no override is set.
#[derive(Clone, Copy, Debug)]
pub struct FlagDefinition {
    pub description: &'static str,
    pub default_value: bool,
    pub environments: &'static [(Environment, bool)],
    /// Checked in order; the first parseable value wins.
    pub override_keys: &'static [&'static str],
}

impl FlagDefinition {
    pub fn for_environment(&self, env: Environment) -> Option<bool> {
        self.environments.iter().find(|(e, _)| *e == env).map(|(_, v)| *v)
    }
}

impl Flag {
    pub const ALL: [Flag; 3] = [Flag::TaskInlineEdit, Flag::TaskBoardDragDrop, Flag::AiTaskDrafts];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskInlineEdit    => "taskInlineEdit",
            Self::TaskBoardDragDrop => "taskBoardDragDrop",
            Self::AiTaskDrafts      => "aiTaskDrafts",
        }
    }

    pub fn definition(self) -> &'static FlagDefinition {
        match self {
            Self::TaskInlineEdit    => &TASK_INLINE_EDIT,
            Self::TaskBoardDragDrop => &TASK_BOARD_DRAG_DROP,
            Self::AiTaskDrafts      => &AI_TASK_DRAFTS,
        }
    }
}

static TASK_INLINE_EDIT: FlagDefinition = FlagDefinition {
    description: "Edit task titles and descriptions in place on the task detail page",
    default_value: false,
    environments: &[
        (Environment::Development, true),
        (Environment::Preview, true),
        (Environment::Test, false),
    ],
    override_keys: &["FEATURE_TASK_INLINE_EDIT", "NEXT_PUBLIC_FEATURE_TASK_INLINE_EDIT"],
};

static TASK_BOARD_DRAG_DROP: FlagDefinition = FlagDefinition {
    description: "Move tasks between board columns by drag and drop",
    default_value: true,
    environments: &[],
    override_keys: &["FEATURE_TASK_BOARD_DND", "NEXT_PUBLIC_FEATURE_TASK_BOARD_DND"],
};

static AI_TASK_DRAFTS: FlagDefinition = FlagDefinition {
    description: "Generate draft tasks from a project description",
    default_value: false,
    environments: &[(Environment::Development, true)],
    override_keys: &["FEATURE_AI_TASK_DRAFTS"],
};

impl FromStr for Flag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
