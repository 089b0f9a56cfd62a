//! Interactive parameter source: asks on `output`, reads answers from `input`.
//!
//! Malformed or out-of-range answers are reported and asked again; end of
//! input aborts with [`IoError::InputClosed`].

use std::io::{BufRead, Write};

use fnm_io::{ElementSizeBounds, IoError, ParameterSource, Result};
use fnm_mesh::Layup;

pub struct PromptParameters<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptParameters<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask<T>(&mut self, question: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        loop {
            write!(self.output, "{question}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(IoError::InputClosed(question.trim().to_string()));
            }
            match parse(line.trim()) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "Invalid answer '{}', please try again.", line.trim())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ParameterSource for PromptParameters<R, W> {
    fn layup(&mut self) -> Result<Layup> {
        let symmetric = self.ask("Is the layup symmetric? (y/n): ", parse_yes_no)?;
        let question = if symmetric {
            "Enter the ply angles from the bottom to the mid-plane, separated by commas or spaces: "
        } else {
            "Enter the ply angles from the bottom to the top, separated by commas or spaces: "
        };
        let angles = self.ask(question, parse_angles)?;
        let thickness = self.ask(
            "Enter the thickness of a single ply (positive real number): ",
            parse_positive,
        )?;
        Ok(Layup::from_angles(&angles, thickness, symmetric)?)
    }

    fn predelam_interface(&mut self, interfaces: usize) -> Result<usize> {
        let question = format!(
            "Enter the pre-delamination interface, 1 means the first interface from the bottom (1-{interfaces}): "
        );
        self.ask(&question, |raw| {
            raw.parse::<usize>()
                .ok()
                .filter(|n| (1..=interfaces).contains(n))
        })
    }

    fn element_size_bounds(&mut self, measured: Option<(f64, f64)>) -> Result<ElementSizeBounds> {
        let hint = measured
            .map(|(min, max)| format!(" [mesh edges measure {min} to {max}]"))
            .unwrap_or_default();
        let min = self.ask(
            &format!("Enter the minimum element size in the mesh (positive real number){hint}: "),
            parse_positive,
        )?;
        let max = self.ask(
            &format!("Enter the maximum element size in the mesh (real number, >= {min}){hint}: "),
            |raw| parse_real(raw).filter(|&max| max >= min),
        )?;
        ElementSizeBounds::new(min, max)
    }
}

fn parse_yes_no(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn parse_real(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_positive(raw: &str) -> Option<f64> {
    parse_real(raw).filter(|&v| v > 0.0)
}

fn parse_angles(raw: &str) -> Option<Vec<f64>> {
    let angles: Option<Vec<f64>> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(parse_real)
        .collect();
    angles.filter(|list| !list.is_empty())
}
