//! In-memory team membership.

use serde::{Deserialize, Serialize};

use crate::policy::TeammateOracle;
use crate::types::ActorId;

/// A team and its members.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    /// Member actors.
    #[serde(default)]
    pub members: Vec<ActorId>,
}

/// Registry of teams. An actor belongs to at most one team; if the data says
/// otherwise, the first team listing the actor is theirs. Two actors are
/// teammates when either one's team lists the other, so the answer does not
/// depend on argument order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRegistry {
    teams: Vec<Team>,
}

impl TeamRegistry {
    /// Registry over the given teams.
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// Add a team with the given members.
    pub fn add_team(&mut self, members: Vec<ActorId>) {
        self.teams.push(Team { members });
    }

    /// Team `actor` belongs to, if any.
    pub fn find_team(&self, actor: ActorId) -> Option<&Team> {
        self.teams.iter().find(|team| team.members.contains(&actor))
    }
}

impl TeammateOracle for TeamRegistry {
    fn are_teammates(&self, a: ActorId, b: ActorId) -> bool {
        let shares = |x: ActorId, y: ActorId| {
            self.find_team(x)
                .is_some_and(|team| team.members.contains(&y))
        };
        shares(a, b) || shares(b, a)
    }
}
