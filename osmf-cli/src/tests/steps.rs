//! Behaviour-driven step definitions driving the find CLI scenarios.

use super::helpers::SampleDataset;
use super::*;
use crate::find::run_find_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

struct FindWorld {
    dataset: SampleDataset,
    source: RefCell<Option<String>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl FindWorld {
    fn new() -> Self {
        Self {
            dataset: SampleDataset::new(),
            source: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["osmf".to_owned(), "find".to_owned()];
        argv.extend(self.cli_args.borrow().iter().cloned());
        if let Some(source) = self.source.borrow().as_ref() {
            argv.extend([format!("--{ARG_OSM_PBF}"), source.clone()]);
        }
        argv
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn expect_error<F>(&self, check: F)
    where
        F: FnOnce(&CliError),
    {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> FindWorld {
    FindWorld::new()
}

#[given("the Berlin sample extract exists on disk")]
fn sample_extract_exists(#[from(world)] world: &FindWorld) {
    world
        .source
        .replace(Some(world.dataset.pbf().as_str().to_owned()));
}

#[given("the extract path points at a missing file")]
fn extract_path_missing(#[from(world)] world: &FindWorld) {
    let missing = world.dataset.root().join("missing.osm.pbf");
    world.source.replace(Some(missing.as_str().to_owned()));
}

#[given("I search within {radius} metres of the Berlin origin")]
fn search_around_origin(#[from(world)] world: &FindWorld, radius: u32) {
    world
        .cli_args
        .borrow_mut()
        .extend(["52.52".to_owned(), "13.405".to_owned(), radius.to_string()]);
}

#[given("I filter on \"{tag}\"")]
fn filter_on(#[from(world)] world: &FindWorld, tag: String) {
    world.cli_args.borrow_mut().push(tag);
}

#[given("I pass the \"{flag}\" flag")]
fn pass_flag(#[from(world)] world: &FindWorld, flag: String) {
    world.cli_args.borrow_mut().push(flag);
}

#[when("I run the find command")]
fn run_find_command(#[from(world)] world: &FindWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Find(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_find_with(args, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &FindWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the output lists \"{key}\" at {distance} metres")]
fn output_lists(#[from(world)] world: &FindWorld, key: String, distance: u64) {
    let (category, id) = key.split_once('/').expect("key has the form category/id");
    let block = format!("meta:distance: {distance}\nmeta:id: {id}\nmeta:type: {category}\n");
    let stdout = world.stdout_text();
    assert!(stdout.contains(&block), "missing {key} in {stdout:?}");
}

#[then("the JSON output holds {count} results")]
fn json_output_holds(#[from(world)] world: &FindWorld, count: usize) {
    let value: Value = serde_json::from_str(&world.stdout_text()).expect("stdout is JSON");
    let records = value.as_array().expect("JSON array");
    assert_eq!(records.len(), count);
    let distances: Vec<u64> = records
        .iter()
        .map(|record| record["distance"].as_u64().expect("known distance"))
        .collect();
    assert!(distances.is_sorted(), "unsorted distances {distances:?}");
}

#[then("the command fails because the extract argument is missing")]
fn command_fails_missing_argument(#[from(world)] world: &FindWorld) {
    world.expect_error(|error| match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_OSM_PBF),
        other => panic!("expected MissingArgument, found {other:?}"),
    });
}

#[then("the command fails because the extract file is missing")]
fn command_fails_missing_file(#[from(world)] world: &FindWorld) {
    world.expect_error(|error| match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_OSM_PBF),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    });
}

macro_rules! register_find_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/find_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: FindWorld) {
            let _ = world;
        }
    };
}

register_find_scenario!(find_prints_text, "printing nearby cafes as text");
register_find_scenario!(find_prints_json, "printing results as JSON");
register_find_scenario!(
    find_resolves_untagged_members,
    "resolving ways through untagged member nodes"
);
register_find_scenario!(find_missing_argument, "rejecting a missing extract argument");
register_find_scenario!(find_missing_file, "rejecting an extract that does not exist");
