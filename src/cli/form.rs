//! Interactive property form.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the form provides the "run `estimate` and answer a few questions" UX
//!
//! Every prompt shows a default; pressing enter keeps it. `q` cancels.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use clap::ValueEnum;

use crate::cli::{check_construction_year, check_zip_code};
use crate::domain::{BuildingState, Epc, KitchenType, Locality, PropertyDetails, PropertyType};
use crate::error::{AppError, EXIT_INPUT};

/// Choices per row when listing options.
const CHOICE_COLUMNS: usize = 3;

/// Prompt for every field of a `PropertyDetails`.
///
/// Defaults match the `predict` flags (a house in Gent).
pub fn collect_property<R: BufRead, W: Write>(input: R, output: W) -> Result<PropertyDetails, AppError> {
    let mut form = Form { input, output };

    let property_type = form.choose("Property Type", &PropertyType::ALL, PropertyType::House, PropertyType::label, |s| {
        s.parse().ok()
    })?;
    let locality = form.choose("Locality", &Locality::ALL, Locality::Gent, Locality::label, |s| s.parse().ok())?;
    let zip_code: u32 = form.ask("Zip Code", 9000, |v| check_zip_code(*v))?;
    let construction_year: i32 = form.ask("Construction Year", 2020, |v| check_construction_year(*v))?;
    let total_area_sqm = form.ask("Total Area (sqm)", 100.0, finite)?;
    let surface_land_sqm = form.ask("Land Surface (sqm)", 120.0, finite)?;
    let garden_sqm = form.ask("Garden Size (sqm)", 15.0, finite)?;
    let nbr_frontages = form.ask("Number of Frontages", 2.0, finite)?;
    let nbr_bedrooms = form.ask("Number of Bedrooms", 1.0, finite)?;
    let kitchen_type = form.choose("Kitchen Type", &KitchenType::ALL, KitchenType::Installed, KitchenType::label, |s| {
        <KitchenType as ValueEnum>::from_str(s, true).ok()
    })?;
    let building_state = form.choose(
        "Building State",
        &BuildingState::ALL,
        BuildingState::Good,
        BuildingState::label,
        |s| <BuildingState as ValueEnum>::from_str(s, true).ok(),
    )?;
    let epc = form.choose("Energy Class (EPC)", &Epc::ALL, Epc::B, Epc::label, |s| {
        <Epc as ValueEnum>::from_str(s, true).ok()
    })?;
    let fl_double_glazing = form.yes_no("Double Glazing", true)?;
    let fl_terrace = form.yes_no("Terrace", true)?;
    let fl_swimming_pool = form.yes_no("Swimming Pool", true)?;
    let fl_floodzone = form.yes_no("Flood Zone", true)?;

    Ok(PropertyDetails {
        property_type,
        locality,
        zip_code,
        construction_year,
        total_area_sqm,
        surface_land_sqm,
        garden_sqm,
        nbr_frontages,
        nbr_bedrooms,
        kitchen_type,
        building_state,
        epc,
        fl_double_glazing,
        fl_terrace,
        fl_swimming_pool,
        fl_floodzone,
    })
}

fn finite(v: &f64) -> Result<(), String> {
    if v.is_finite() { Ok(()) } else { Err("Enter a number.".to_string()) }
}

struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    /// Read one trimmed answer. `None` means "keep the default".
    fn answer(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{prompt}")
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                EXIT_INPUT,
                "No input received. Use `estimate predict` to pass values as flags.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(EXIT_INPUT, "Canceled."));
        }
        Ok(if line.is_empty() { None } else { Some(line.to_string()) })
    }

    fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}").map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write prompt: {e}")))
    }

    fn ask<T>(&mut self, label: &str, default: T, check: impl Fn(&T) -> Result<(), String>) -> Result<T, AppError>
    where
        T: FromStr + Display,
    {
        loop {
            let Some(raw) = self.answer(&format!("{label} [{default}]: "))? else {
                return Ok(default);
            };
            match raw.parse::<T>() {
                Ok(v) => match check(&v) {
                    Ok(()) => return Ok(v),
                    Err(msg) => self.say(&msg)?,
                },
                Err(_) => self.say(&format!("Invalid value: {raw}"))?,
            }
        }
    }

    fn choose<T>(
        &mut self,
        label: &str,
        options: &[T],
        default: T,
        name: fn(T) -> &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, AppError>
    where
        T: Copy,
    {
        let mut listing = format!("{label}:");
        for (idx, opt) in options.iter().enumerate() {
            if idx % CHOICE_COLUMNS == 0 {
                listing.push('\n');
            }
            listing.push_str(&format!("{:>4}) {:<20}", idx + 1, name(*opt)));
        }
        self.say(listing.trim_end())?;

        loop {
            let prompt = format!("Select 1-{} or type a name [{}]: ", options.len(), name(default));
            let Some(raw) = self.answer(&prompt)? else {
                return Ok(default);
            };
            if let Ok(choice) = raw.parse::<usize>() {
                if (1..=options.len()).contains(&choice) {
                    return Ok(options[choice - 1]);
                }
                self.say(&format!(
                    "Invalid choice: {choice}. Enter a number between 1 and {}.",
                    options.len()
                ))?;
                continue;
            }
            match parse(&raw) {
                Some(v) => return Ok(v),
                None => self.say(&format!("Unknown {}: {raw}", label.to_lowercase()))?,
            }
        }
    }

    fn yes_no(&mut self, label: &str, default: bool) -> Result<bool, AppError> {
        let shown = if default { "Y/n" } else { "y/N" };
        loop {
            let Some(raw) = self.answer(&format!("{label} [{shown}]: "))? else {
                return Ok(default);
            };
            match raw.to_ascii_lowercase().as_str() {
                "y" | "yes" | "1" | "true" => return Ok(true),
                "n" | "no" | "0" | "false" => return Ok(false),
                _ => self.say("Answer yes or no.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::validate::tests::gent_house;

    fn run(answers: &[&str]) -> (Result<PropertyDetails, AppError>, String) {
        let input = Cursor::new(answers.join("\n") + "\n");
        let mut output = Vec::new();
        let result = collect_property(input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn enter_everywhere_gives_defaults() {
        let (result, output) = run(&[""; 16]);
        assert_eq!(result.unwrap(), gent_house());
        assert!(output.contains("Zip Code [9000]: "));
        assert!(output.contains("  13) Gent"));
    }

    #[test]
    fn answers_by_number_and_name() {
        let (result, _) = run(&[
            "2", "liège", "4000", "1975", "90", "90", "0", "2", "3", "usa_semi_equipped", "1", "A++", "y", "n", "no",
            "0",
        ]);
        let d = result.unwrap();
        assert_eq!(d.property_type, PropertyType::Apartment);
        assert_eq!(d.locality, Locality::Liege);
        assert_eq!(d.zip_code, 4000);
        assert_eq!(d.construction_year, 1975);
        assert_eq!(d.total_area_sqm, 90.0);
        assert_eq!(d.garden_sqm, 0.0);
        assert_eq!(d.nbr_bedrooms, 3.0);
        assert_eq!(d.kitchen_type, KitchenType::UsaSemiEquipped);
        assert_eq!(d.building_state, BuildingState::ToRestore);
        assert_eq!(d.epc, Epc::APlusPlus);
        assert!(d.fl_double_glazing);
        assert!(!d.fl_terrace);
        assert!(!d.fl_swimming_pool);
        assert!(!d.fl_floodzone);
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let mut answers = vec!["", "", "", "1700", "2000", "lots", "150"];
        answers.extend([""; 11]);
        let (result, output) = run(&answers);
        let d = result.unwrap();
        assert_eq!(d.construction_year, 2000);
        assert_eq!(d.total_area_sqm, 150.0);
        assert!(output.contains("Construction year must be between 1800 and 2024."));
        assert!(output.contains("Invalid value: lots"));
    }

    #[test]
    fn out_of_range_choice_is_asked_again() {
        let mut answers = vec!["7", "1"];
        answers.extend([""; 15]);
        let (result, output) = run(&answers);
        assert_eq!(result.unwrap().property_type, PropertyType::House);
        assert!(output.contains("Invalid choice: 7. Enter a number between 1 and 2."));
    }

    #[test]
    fn q_cancels() {
        let (result, _) = run(&["", "q"]);
        assert_eq!(result.unwrap_err().to_string(), "Canceled.");
    }

    #[test]
    fn end_of_input_is_an_error() {
        let (result, _) = run(&["", ""]);
        assert_eq!(result.unwrap_err().exit_code(), EXIT_INPUT);
    }
}
