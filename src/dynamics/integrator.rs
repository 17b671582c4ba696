use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::state::StateVector;

/// Tolerances and step bounds for the adaptive solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Absolute error tolerance.
    pub atol: f64,
    /// Relative error tolerance.
    pub rtol: f64,
    /// First attempted step size (s).
    pub initial_step: f64,
    /// Smallest step before the run is abandoned (s).
    pub min_step: f64,
    /// Largest step the controller may select (s).
    pub max_step: f64,
    /// Hard cap on accepted plus rejected steps.
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            atol: 1e-8,
            rtol: 1e-8,
            initial_step: 0.05,
            min_step: 1e-10,
            max_step: 1.0,
            max_steps: 1_000_000,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.atol > 0.0) || !(self.rtol > 0.0) {
            return Err(SimError::invalid_config(
                "atol/rtol",
                "tolerances must be positive",
            ));
        }
        if !(self.min_step > 0.0) || self.min_step >= self.max_step {
            return Err(SimError::invalid_config(
                "min_step",
                "must be positive and below max_step",
            ));
        }
        Ok(())
    }
}

/// Time and state history of one integration, one row per accepted step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationOutput {
    pub time: Vec<f64>,
    pub states: Vec<StateVector>,
}

// Dormand-Prince 4(5) tableau (DOPRI5).
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 6] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

// Fifth-order solution weights.
const B5: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

// Embedded fourth-order weights for the error estimate.
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// Adaptive embedded Runge-Kutta 4(5) integrator.
///
/// Stateless between calls: each [`Rk45Integrator::integrate`] invocation is
/// a fresh solve, so nothing leaks across scenarios.
#[derive(Debug, Clone, Copy)]
pub struct Rk45Integrator {
    pub config: IntegratorConfig,
}

impl Rk45Integrator {
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    /// Integrate `rhs` from `t0` to `t_end`, recording every accepted step.
    ///
    /// Fails with [`SimError::Integration`] on step-size collapse or step
    /// budget exhaustion; the caller decides whether to skip or abort.
    pub fn integrate<F>(
        &self,
        initial_state: &StateVector,
        t0: f64,
        t_end: f64,
        rhs: F,
    ) -> Result<IntegrationOutput>
    where
        F: Fn(f64, &StateVector) -> StateVector,
    {
        self.config.validate()?;

        let mut t = t0;
        let mut y = *initial_state;
        let mut h = self.config.initial_step.min(self.config.max_step);

        let mut time = vec![t];
        let mut states = vec![y];
        let mut steps = 0usize;

        while t < t_end {
            if steps >= self.config.max_steps {
                return Err(SimError::Integration {
                    reason: format!("step budget of {} exhausted", self.config.max_steps),
                    time: t,
                });
            }
            steps += 1;

            // Do not overshoot the end of the span.
            if t + h > t_end {
                h = t_end - t;
            }

            let (y_new, error_norm) = self.step(&y, t, h, &rhs);

            if !error_norm.is_finite() {
                return Err(SimError::Integration {
                    reason: "non-finite state derivative".to_string(),
                    time: t,
                });
            }

            if error_norm <= 1.0 {
                t += h;
                y = y_new;
                time.push(t);
                states.push(y);

                let factor = if error_norm < 1e-12 {
                    5.0
                } else {
                    (0.9 * error_norm.powf(-0.2)).clamp(0.2, 5.0)
                };
                h = (h * factor).min(self.config.max_step);
            } else {
                h *= (0.9 * error_norm.powf(-0.25)).max(0.1);
                if h < self.config.min_step {
                    return Err(SimError::Integration {
                        reason: format!("step size collapsed below {:.3e}", self.config.min_step),
                        time: t,
                    });
                }
            }
        }

        Ok(IntegrationOutput { time, states })
    }

    /// One Dormand-Prince step. Returns the fifth-order solution and the
    /// scaled error norm of the embedded fourth-order difference.
    fn step<F>(&self, y: &StateVector, t: f64, h: f64, rhs: &F) -> (StateVector, f64)
    where
        F: Fn(f64, &StateVector) -> StateVector,
    {
        let mut k: [StateVector; 7] = [StateVector::zeros(); 7];
        k[0] = rhs(t, y);

        for i in 1..7 {
            let mut y_stage = *y;
            for (j, k_j) in k.iter().enumerate().take(i) {
                y_stage += k_j * (h * A[i - 1][j]);
            }
            k[i] = rhs(t + C[i] * h, &y_stage);
        }

        let mut y_new = *y;
        let mut error = StateVector::zeros();
        for i in 0..7 {
            y_new += k[i] * (h * B5[i]);
            error += k[i] * (h * (B5[i] - B4[i]));
        }

        let mut error_norm: f64 = 0.0;
        for i in 0..y.len() {
            let scale = self.config.atol + self.config.rtol * y[i].abs().max(y_new[i].abs());
            let ratio = (error[i] / scale).abs();
            // f64::max would discard a NaN ratio, so force the norm to
            // infinity as soon as any component degenerates.
            if !ratio.is_finite() || !y_new[i].is_finite() {
                return (y_new, f64::INFINITY);
            }
            error_norm = error_norm.max(ratio);
        }

        (y_new, error_norm)
    }
}

impl Default for Rk45Integrator {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}
