use formq_core::form::{cities_for, states_for};

use crate::error::CliError;

pub fn run_regions(country: &str, state: Option<&str>) -> Result<(), CliError> {
    let lines = region_lines(country, state);
    if lines.is_empty() {
        match state {
            Some(state) => println!("No cities listed for {state}"),
            None => println!("No states listed for {country}"),
        }
        return Ok(());
    }

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub fn region_lines(country: &str, state: Option<&str>) -> Vec<String> {
    match state {
        Some(state) => cities_for(state).iter().map(ToString::to_string).collect(),
        None => states_for(country)
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    }
}
