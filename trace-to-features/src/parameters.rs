use std::str::FromStr;

use anyhow::{Error, anyhow};
use clap::{Parser, Subcommand};

use crate::feature_extraction::{
    Real,
    cfd::{EdgeStrategy, EvaluationWindows},
    edge::{DerivativeEdge, ThresholdEdge},
};

#[derive(Default, Debug, Clone)]
pub struct ThresholdEdgeWrapper(pub(crate) ThresholdEdge);

impl FromStr for ThresholdEdgeWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').collect();
        if vals.len() == 3 {
            Ok(ThresholdEdgeWrapper(ThresholdEdge {
                cut_mv: Real::from_str(vals[0])?,
                points_within_cut: usize::from_str(vals[1])?,
                total_step: usize::from_str(vals[2])?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in threshold edge, expected pattern '*,*,*', got '{s}'"
            ))
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct DerivativeEdgeWrapper(pub(crate) DerivativeEdge);

impl FromStr for DerivativeEdgeWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').collect();
        if vals.len() == 2 {
            Ok(DerivativeEdgeWrapper(DerivativeEdge {
                integration_time_ns: Real::from_str(vals[0])?,
                threshold_mv: Real::from_str(vals[1])?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in derivative edge, expected pattern '*,*', got '{s}'"
            ))
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct EvaluationWindowsWrapper(pub(crate) EvaluationWindows);

impl FromStr for EvaluationWindowsWrapper {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').collect();
        if vals.len() == 4 {
            Ok(EvaluationWindowsWrapper(EvaluationWindows {
                baseline_evaluation_ns: Real::from_str(vals[0])?,
                start_before_t0_ns: Real::from_str(vals[1])?,
                underline_evaluation_ns: Real::from_str(vals[2])?,
                start_after_t0_ns: Real::from_str(vals[3])?,
            }))
        } else {
            Err(anyhow!(
                "Incorrect number of parameters in evaluation windows, expected pattern '*,*,*,*', got '{s}'"
            ))
        }
    }
}

#[derive(Default, Debug, Clone, Parser)]
pub struct ThresholdParameters {
    pub edge: ThresholdEdgeWrapper,
    #[clap(long, default_value = "2.5,15,1.25,21.5")]
    pub windows: EvaluationWindowsWrapper,
    #[clap(long)]
    pub resample_step_ns: Option<Real>,
    #[clap(long)]
    pub min_amplitude_mv: Option<Real>,
}

#[derive(Default, Debug, Clone, Parser)]
pub struct DerivativeParameters {
    pub edge: DerivativeEdgeWrapper,
    #[clap(long, default_value = "2.5,15,1.25,21.5")]
    pub windows: EvaluationWindowsWrapper,
    #[clap(long)]
    pub resample_step_ns: Option<Real>,
    #[clap(long)]
    pub min_amplitude_mv: Option<Real>,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    #[clap(
        about = "Locates t0 with the baseline-deviation run detector and evaluates levels in windows placed around it."
    )]
    Threshold(ThresholdParameters),
    #[clap(
        about = "Locates t0 at the minimum of the rolling box-car derivative and evaluates levels in symmetric windows."
    )]
    Derivative(DerivativeParameters),
}

impl Mode {
    pub fn edge_strategy(&self) -> EdgeStrategy {
        match self {
            Mode::Threshold(parameters) => EdgeStrategy::Threshold(parameters.edge.0.clone()),
            Mode::Derivative(parameters) => EdgeStrategy::Derivative(parameters.edge.0.clone()),
        }
    }

    pub fn windows(&self) -> EvaluationWindows {
        match self {
            Mode::Threshold(parameters) => parameters.windows.0.clone(),
            Mode::Derivative(parameters) => parameters.windows.0.clone(),
        }
    }

    pub fn resample_step_ns(&self) -> Option<Real> {
        match self {
            Mode::Threshold(parameters) => parameters.resample_step_ns,
            Mode::Derivative(parameters) => parameters.resample_step_ns,
        }
    }

    pub fn min_amplitude_mv(&self) -> Option<Real> {
        match self {
            Mode::Threshold(parameters) => parameters.min_amplitude_mv,
            Mode::Derivative(parameters) => parameters.min_amplitude_mv,
        }
    }
}
