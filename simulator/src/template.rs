/// Idealised pulse shapes. All of them describe a falling pulse: a high
/// baseline plateau before the edge and a low underline plateau after it,
/// matching the polarity of the source-follower output the analysis targets.
#[derive(Clone, Debug, PartialEq)]
pub enum PulseTemplate {
    /// Constant level, no pulse.
    Flat { level_mv: f64 },
    /// Instantaneous transition at `edge_ns`.
    Step {
        baseline_mv: f64,
        underline_mv: f64,
        edge_ns: f64,
    },
    /// Linear fall from baseline to underline starting at `edge_start_ns`
    /// and completing after `fall_time_ns`.
    Trapezoid {
        baseline_mv: f64,
        underline_mv: f64,
        edge_start_ns: f64,
        fall_time_ns: f64,
    },
}

impl PulseTemplate {
    pub fn value_at(&self, time_ns: f64) -> f64 {
        match *self {
            PulseTemplate::Flat { level_mv } => level_mv,
            PulseTemplate::Step {
                baseline_mv,
                underline_mv,
                edge_ns,
            } => {
                if time_ns < edge_ns {
                    baseline_mv
                } else {
                    underline_mv
                }
            }
            PulseTemplate::Trapezoid {
                baseline_mv,
                underline_mv,
                edge_start_ns,
                fall_time_ns,
            } => {
                if time_ns <= edge_start_ns {
                    baseline_mv
                } else if time_ns >= edge_start_ns + fall_time_ns {
                    underline_mv
                } else {
                    let progress = (time_ns - edge_start_ns) / fall_time_ns;
                    baseline_mv + (underline_mv - baseline_mv) * progress
                }
            }
        }
    }

    /// Time at which the pulse crosses the given fraction of its amplitude,
    /// measured downwards from the baseline. Returns `None` for [`Flat`].
    ///
    /// [`Flat`]: PulseTemplate::Flat
    pub fn crossing_time(&self, fraction: f64) -> Option<f64> {
        match *self {
            PulseTemplate::Flat { .. } => None,
            PulseTemplate::Step { edge_ns, .. } => Some(edge_ns),
            PulseTemplate::Trapezoid {
                edge_start_ns,
                fall_time_ns,
                ..
            } => Some(edge_start_ns + fraction * fall_time_ns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn trapezoid_plateaus_and_ramp() {
        let template = PulseTemplate::Trapezoid {
            baseline_mv: 100.0,
            underline_mv: 20.0,
            edge_start_ns: 10.0,
            fall_time_ns: 4.0,
        };
        assert_approx_eq!(template.value_at(0.0), 100.0);
        assert_approx_eq!(template.value_at(10.0), 100.0);
        assert_approx_eq!(template.value_at(12.0), 60.0);
        assert_approx_eq!(template.value_at(14.0), 20.0);
        assert_approx_eq!(template.value_at(100.0), 20.0);
    }

    #[test]
    fn trapezoid_crossing_times() {
        let template = PulseTemplate::Trapezoid {
            baseline_mv: 100.0,
            underline_mv: 20.0,
            edge_start_ns: 10.0,
            fall_time_ns: 4.0,
        };
        assert_approx_eq!(template.crossing_time(0.5).unwrap(), 12.0);
        let half = template.crossing_time(0.5).unwrap();
        assert_approx_eq!(template.value_at(half), 60.0);
    }
}
