//! Property tests for planning and the model success rates.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use gridjudge_sim::{
    Action, Agent, DoorChanges, Environment, GridWorld, Model, PathColor, Predictions, SimParams,
    TrialSpec, simulate_trial,
};

/// Red along the top row, blue along the bottom row and up the last column,
/// each with one door whose initial state is given
fn corridor(cells: usize, red_open: bool, blue_open: bool, prob_door: f64) -> GridWorld {
    let row = |start: char, last: char| {
        let mut row = String::from(start);
        for x in 1..cells {
            row.push(if x == 2 { '|' } else { ' ' });
            row.push(if x == cells - 1 { last } else { ' ' });
        }
        row
    };
    let mut middle: String = "X ".repeat(cells - 1);
    middle.push(' ');
    let text = format!(
        "{}\n{}\n\n{}\n{}\n{}\n",
        u8::from(red_open),
        u8::from(blue_open),
        row('r', 'g'),
        middle,
        row('b', ' '),
    );
    GridWorld::parse(&text, prob_door, 3 * cells as u32).unwrap()
}

proptest! {
    #[test]
    fn planned_paths_are_chains_of_valid_moves(
        cells in 4usize..12,
        red_open: bool,
        blue_open: bool,
    ) {
        let world = corridor(cells, red_open, blue_open, 0.2);
        let goal = world.goal_location().unwrap();
        prop_assert_eq!(goal, (cells - 1, 0));

        for color in [PathColor::Red, PathColor::Blue] {
            let path = world.shortest_path(world.start_location(color), goal).unwrap();
            prop_assert_eq!(path.first().copied(), Some(world.start_location(color)));
            prop_assert_eq!(path.last().copied(), Some(goal));
            for pair in path.windows(2) {
                let action = Action::between(pair[0], pair[1]);
                prop_assert!(action.is_some_and(|a| a != Action::Stay));
                prop_assert!(world.is_valid_action(pair[0], action.unwrap()));
            }
        }
        let blue = world.start_location(PathColor::Blue);
        prop_assert_eq!(world.gridsquares_between(blue, goal), Some(cells + 1));
    }

    #[test]
    fn success_rates_are_percentages_and_seeded(
        cells in 4usize..8,
        prob_door in 0.0f64..=1.0,
        prob_stall in 0.0f64..=1.0,
        num in 1u32..500,
        path in prop_oneof![Just(PathColor::Red), Just(PathColor::Blue)],
    ) {
        let params = SimParams {
            prob_stall,
            prob_door,
            time_limit: 3 * cells as u32,
            n_simulations: 40,
        };
        let spec = TrialSpec { num, path, door_changes: DoorChanges::new() };
        let both = Predictions { counterfactual: true, hypothetical: true };

        let first = simulate_trial(&spec, corridor(cells, true, false, prob_door), &params, both)
            .unwrap();
        let again = simulate_trial(&spec, corridor(cells, true, false, prob_door), &params, both)
            .unwrap();
        prop_assert_eq!(&first, &again);
        prop_assert!(first.cf_success_rate.is_some_and(|r| r <= 100));
        prop_assert!(first.hyp_success_rate.is_some_and(|r| r <= 100));
    }

    #[test]
    fn open_doors_and_no_stalling_always_win(cells in 4usize..12, path: bool) {
        let color = if path { PathColor::Red } else { PathColor::Blue };
        let env = Environment::replaying(
            corridor(cells, true, true, 0.0),
            Agent::new(color, 0.0),
        );
        let mut model = Model::hypothetical(&env);
        let mut rng = StdRng::seed_from_u64(cells as u64);
        prop_assert_eq!(model.simulate_all(10, &mut rng).unwrap(), 100);
    }
}
