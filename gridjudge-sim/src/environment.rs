use crate::error::SimError;
use crate::world::{Action, GridWorld, Location, PathColor};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

/// Recorded door switches: timestep to the locations of the doors that
/// toggled at the end of it
pub type DoorChanges = BTreeMap<u32, Vec<Location>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub path: PathColor,
    /// Chance of not moving on a simulated timestep
    pub prob_stall: f64,
    pub location: Location,
}

impl Agent {
    pub fn new(path: PathColor, prob_stall: f64) -> Self {
        Self {
            path,
            prob_stall,
            location: (0, 0),
        }
    }

    pub fn move_to(&mut self, location: Location) {
        self.location = location;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Last timestep played
    pub timesteps: u32,
    pub outcome: Outcome,
}

/// An agent walking its path through a grid world until it reaches the goal
/// or runs out of time
#[derive(Debug, Clone)]
pub struct Environment {
    world: GridWorld,
    agent: Agent,
    replay: bool,
}

impl Environment {
    /// The agent may stall and doors switch at random
    pub fn new(world: GridWorld, agent: Agent) -> Self {
        Self::with_replay(world, agent, false)
    }

    /// Replays a recorded round: the agent never stalls and doors switch only
    /// as recorded
    pub fn replaying(world: GridWorld, agent: Agent) -> Self {
        Self::with_replay(world, agent, true)
    }

    fn with_replay(world: GridWorld, mut agent: Agent, replay: bool) -> Self {
        agent.location = world.start_location(agent.path);
        Self {
            world,
            agent,
            replay,
        }
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn is_replay(&self) -> bool {
        self.replay
    }

    pub(crate) fn set_replay(&mut self, replay: bool) {
        self.replay = replay;
    }

    pub(crate) fn switch_path(&mut self) {
        self.agent.path = self.agent.path.opposite();
    }

    pub fn reached_goal(&self) -> bool {
        self.world.goal_location() == Some(self.agent.location)
    }

    /// Actions along a shortest path from the agent to the goal
    pub fn plan_path(&self) -> Result<VecDeque<Action>, SimError> {
        let goal = self.world.goal_location().ok_or(SimError::NoGoal)?;
        let from = self.agent.location;
        let locations = self
            .world
            .shortest_path(from, goal)
            .ok_or(SimError::NoPath { from, to: goal })?;
        Ok(locations
            .windows(2)
            .filter_map(|pair| Action::between(pair[0], pair[1]))
            .collect())
    }

    /// Take the next planned action. A blocked action, or any action while a
    /// closed door is directly to the agent's right, stays queued.
    fn execute<R: Rng>(&mut self, path: &mut VecDeque<Action>, rng: &mut R) {
        if !self.replay && rng.random::<f64>() < self.agent.prob_stall {
            trace!(location = ?self.agent.location, "agent stalled");
            return;
        }
        let Some(action) = path.pop_front() else {
            return;
        };

        let location = self.agent.location;
        let door_closed = self
            .world
            .door_right_of(location)
            .is_some_and(|door| !door.is_open);
        if door_closed || !self.world.is_valid_action(location, action) {
            path.push_front(action);
        } else {
            let next = self.world.new_location(location, action);
            self.agent.move_to(next);
        }
    }

    /// Play one round. Up to `original_runtime` (and throughout a replay)
    /// doors follow `door_changes`; afterwards each door switches with its
    /// own probability.
    pub fn run<R: Rng>(
        &mut self,
        rng: &mut R,
        door_changes: &DoorChanges,
        original_runtime: u32,
    ) -> Result<RunSummary, SimError> {
        let mut path = VecDeque::new();
        let mut summary = RunSummary {
            timesteps: 0,
            outcome: Outcome::Lost,
        };

        for t in 1..=self.world.time_limit() {
            summary.timesteps = t;
            if path.is_empty() {
                path = self.plan_path()?;
            }
            self.execute(&mut path, rng);
            trace!(t, location = ?self.agent.location, "agent step");

            let recorded = self.replay || t <= original_runtime;
            let changes = door_changes.get(&t);
            for door in self.world.doors_mut() {
                let toggle = if recorded {
                    changes.is_some_and(|locations| locations.contains(&door.location))
                } else {
                    rng.random::<f64>() < door.prob
                };
                if toggle {
                    door.toggle();
                    trace!(t, location = ?door.location, open = door.is_open, "door switched");
                }
            }

            if self.reached_goal() {
                summary.outcome = Outcome::Won;
                break;
            }
        }

        Ok(summary)
    }

    /// Restore doors and put the agent back on its start tile
    pub fn reset(&mut self) {
        self.world.reset_doors();
        self.agent.location = self.world.start_location(self.agent.path);
    }
}
