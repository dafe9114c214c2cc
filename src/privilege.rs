//! Privilege escalation.
//!
//! Steps that write outside the operator's home (or change their login shell)
//! run their commands through an elevation tool. The tool is chosen once in
//! the profile; each task only carries whether it elevates.

use serde::{Deserialize, Serialize};

/// Privilege escalation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeMethod {
    /// Use `sudo` for privilege escalation.
    #[default]
    Sudo,
    /// Use `doas` for privilege escalation.
    Doas,
}

impl PrivilegeMethod {
    /// Returns the command name for this privilege method.
    pub fn command_name(&self) -> &'static str {
        match self {
            Self::Sudo => "sudo",
            Self::Doas => "doas",
        }
    }

    /// Returns `Some(self)` when `elevate` is set, `None` otherwise.
    pub fn when(self, elevate: bool) -> Option<Self> {
        elevate.then_some(self)
    }
}

impl std::fmt::Display for PrivilegeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command_name())
    }
}
