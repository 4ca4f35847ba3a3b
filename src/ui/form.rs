//! Patient Form
//!
//! Line-oriented questionnaire over any reader/writer pair. Each question
//! shows its default; an empty answer accepts it and an invalid answer
//! asks again.

use std::io::{BufRead, Read, Write};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{
    BrushingFrequency, Consumption, DentistVisits, FormOption, Gender, OralProblem,
    PatientAttributes, PatientAttributesBuilder,
};
use crate::utils::constants::{AGE_MAX, AGE_MIN, BRUSHING_MINUTES_MAX, BRUSHING_MINUTES_MIN};

pub struct PatientForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PatientForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask every question and build the validated record
    pub fn collect(&mut self) -> AppResult<PatientAttributes> {
        let defaults = PatientAttributesBuilder::default().build()?;

        self.heading("Patient data")?;
        let age = self.ask_number("Age", AGE_MIN, AGE_MAX, defaults.age() as i64)?;
        let gender: Gender = self.ask_choice("Gender", defaults.gender())?;

        self.heading("Oral hygiene habits")?;
        let brushing_frequency: BrushingFrequency =
            self.ask_choice("Daily brushing frequency", defaults.brushing_frequency())?;
        let minutes = self.ask_number(
            "Average brushing time (minutes)",
            BRUSHING_MINUTES_MIN,
            BRUSHING_MINUTES_MAX,
            defaults.brushing_duration_minutes() as i64,
        )?;
        let floss = self.ask_yes_no("Uses dental floss", defaults.uses_floss())?;
        let mouthwash = self.ask_yes_no("Uses mouthwash", defaults.uses_mouthwash())?;

        self.heading("Risk factors")?;
        let smoker = self.ask_yes_no("Smoker", defaults.is_smoker())?;
        let sugar: Consumption = self.ask_choice("Sugar consumption", defaults.sugar_consumption())?;
        let alcohol: Consumption =
            self.ask_choice("Alcohol consumption", defaults.alcohol_consumption())?;

        self.heading("Medical history")?;
        let problem: OralProblem =
            self.ask_choice("History of oral problems", defaults.prior_oral_problem())?;
        let family = self.ask_yes_no("Family history of oral problems", defaults.family_history())?;

        self.heading("Preventive care")?;
        let visits: DentistVisits =
            self.ask_choice("Dentist visit frequency", defaults.dentist_visit_frequency())?;

        let attrs = PatientAttributes::builder()
            .age(age)
            .gender(gender)
            .brushing_frequency(brushing_frequency)
            .brushing_duration_minutes(minutes)
            .uses_floss(floss)
            .uses_mouthwash(mouthwash)
            .smoker(smoker)
            .sugar_consumption(sugar)
            .alcohol_consumption(alcohol)
            .prior_oral_problem(problem)
            .family_history(family)
            .dentist_visit_frequency(visits)
            .build()?;
        Ok(attrs)
    }

    fn heading(&mut self, title: &str) -> AppResult<()> {
        writeln!(self.output, "\n── {} ──", title)?;
        Ok(())
    }

    fn ask_number(&mut self, prompt: &str, min: i64, max: i64, default: i64) -> AppResult<i64> {
        loop {
            write!(self.output, "{} ({}-{}) [{}]: ", prompt, min, max, default)?;
            self.output.flush()?;
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<i64>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => writeln!(self.output, "  Enter a whole number from {} to {}.", min, max)?,
            }
        }
    }

    fn ask_choice<T: FormOption>(&mut self, prompt: &str, default: T) -> AppResult<T> {
        writeln!(self.output, "{}:", prompt)?;
        for (i, option) in T::ALL.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option.label())?;
        }
        loop {
            write!(self.output, "Choice [{}]: ", default.index() + 1)?;
            self.output.flush()?;
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(default);
            }
            let picked = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| T::ALL.get(i));
            match picked {
                Some(option) => return Ok(*option),
                None => writeln!(self.output, "  Pick a number from 1 to {}.", T::ALL.len())?,
            }
        }
    }

    fn ask_yes_no(&mut self, prompt: &str, default: bool) -> AppResult<bool> {
        loop {
            write!(self.output, "{} (y/n) [{}]: ", prompt, if default { "y" } else { "n" })?;
            self.output.flush()?;
            match self.read_answer()?.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  Answer y or n.")?,
            }
        }
    }

    fn read_answer(&mut self) -> AppResult<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::invalid_input("input closed before the form was complete"));
        }
        Ok(line.trim().to_string())
    }
}

/// Read one patient as JSON in the numeric encoding
pub fn read_patient_json<R: Read>(reader: R) -> AppResult<PatientAttributes> {
    let attrs: PatientAttributes = serde_json::from_reader(reader)?;
    Ok(attrs)
}
