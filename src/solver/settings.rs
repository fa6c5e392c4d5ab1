use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Algebraic strategy used by [`SaddlePointSolver::decompose`](crate::solver::SaddlePointSolver::decompose).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SaddlePointMethod {
    /// LU factorization of the complete block matrix.
    #[default]
    Fullspace,
    /// Eliminate the basic variables through the canonical form, then factor
    /// the reduced system over the non-basic variables.
    Nullspace,
    /// Eliminate the free variables in closed form through a diagonal `Hxx`,
    /// then factor the reduced system over the multipliers.
    Rangespace,
}

/// Tolerances of the [`Canonicalizer`](crate::solver::Canonicalizer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalizerSettings<T> {
    /// rank threshold, relative to the largest absolute entry of `A`
    pub pivot_tolerance: T,
    /// fraction of the largest remaining candidate that is still an acceptable pivot
    pub pivot_threshold: T,
    /// relative threshold used when cleaning roundoff from the canonical form
    pub roundoff_tolerance: T,
}

impl<T> Default for CanonicalizerSettings<T>
where
    T: FloatT,
{
    fn default() -> Self {
        SaddlePointSettings::<T>::default().canonicalizer_settings()
    }
}

/// Settings of the [`SaddlePointSolver`](crate::solver::SaddlePointSolver).
///
/// Construct with the builder, e.g.
///
/// ```
/// use saddlepoint::solver::*;
///
/// let settings = SaddlePointSettingsBuilder::<f64>::default()
///     .method(SaddlePointMethod::Nullspace)
///     .residual_tolerance(1e-10)
///     .build()
///     .unwrap();
/// assert_eq!(settings.pivot_threshold, 0.1);
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SaddlePointSettings<T: FloatT> {
    ///algebraic strategy for decomposition
    #[builder(default = "SaddlePointMethod::Fullspace")]
    pub method: SaddlePointMethod,

    ///pivoting rule of the LU factorizations
    #[builder(default = "LuPivoting::Full")]
    pub lu_pivoting: LuPivoting,

    ///LU rank threshold, relative to the largest pivot of the equilibrated matrix
    #[builder(default = "(1e-12).as_T()")]
    pub lu_rank_tolerance: T,

    ///equilibrate every factorized matrix before elimination
    #[builder(default = "true")]
    pub equilibrate_enable: bool,

    /// maximum equilibration scaling iterations
    #[builder(default = "10")]
    pub equilibrate_max_iter: u32,

    ///minimum equilibration scaling allowed
    #[builder(default = "(1e-4).as_T()")]
    pub equilibrate_min_scaling: T,

    ///maximum equilibration scaling allowed
    #[builder(default = "(1e+4).as_T()")]
    pub equilibrate_max_scaling: T,

    ///canonicalizer rank threshold, relative to the largest absolute entry of A
    #[builder(default = "(1e-10).as_T()")]
    pub pivot_tolerance: T,

    ///canonicalizer acceptance threshold, relative to the largest candidate pivot
    #[builder(default = "(0.1).as_T()")]
    pub pivot_threshold: T,

    ///relative threshold for cleaning roundoff from the canonical form
    #[builder(default = "(1e-14).as_T()")]
    pub roundoff_tolerance: T,

    ///clean roundoff from the canonical form after every canonicalization
    #[builder(default = "false")]
    pub clean_roundoff_enable: bool,

    ///relative residual below which a solve is reported as solved
    #[builder(default = "(1e-12).as_T()")]
    pub residual_tolerance: T,

    ///refine solutions against the complete block matrix
    #[builder(default = "true")]
    pub iterative_refinement_enable: bool,

    ///iterative refinement relative tolerance
    #[builder(default = "(1e-15).as_T()")]
    pub iterative_refinement_reltol: T,

    ///iterative refinement absolute tolerance
    #[builder(default = "(1e-15).as_T()")]
    pub iterative_refinement_abstol: T,

    ///iterative refinement maximum iterations
    #[builder(default = "5")]
    pub iterative_refinement_max_iter: u32,

    ///iterative refinement stalling tolerance
    #[builder(default = "(5.0).as_T()")]
    pub iterative_refinement_stop_ratio: T,
}

impl<T> Default for SaddlePointSettings<T>
where
    T: FloatT,
{
    fn default() -> SaddlePointSettings<T> {
        SaddlePointSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> SaddlePointSettings<T>
where
    T: FloatT,
{
    /// The subset of settings used by the canonicalizer.
    pub fn canonicalizer_settings(&self) -> CanonicalizerSettings<T> {
        CanonicalizerSettings {
            pivot_tolerance: self.pivot_tolerance,
            pivot_threshold: self.pivot_threshold,
            roundoff_tolerance: self.roundoff_tolerance,
        }
    }

    /// The equilibration applied before every saddle point factorization.
    pub fn lu_equilibration(&self) -> Option<EquilibrationSettings<T>> {
        self.equilibrate_enable.then_some(EquilibrationSettings {
            max_iter: self.equilibrate_max_iter,
            min_scaling: self.equilibrate_min_scaling,
            max_scaling: self.equilibrate_max_scaling,
        })
    }

    /// Factorize a saddle point matrix or a reduced system with the
    /// pivoting, tolerance and equilibration of these settings.
    pub fn factorize<M>(&self, K: &M) -> Result<LuFactorization<T>, DenseFactorizationError>
    where
        M: DenseMatrix<T>,
    {
        match self.lu_equilibration() {
            Some(equilibrate) => LuFactorization::new_equilibrated(
                K,
                self.lu_pivoting,
                self.lu_rank_tolerance,
                equilibrate,
            ),
            None => LuFactorization::new(K, self.lu_pivoting, self.lu_rank_tolerance),
        }
    }

    /// Checks that all numerical values are in range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_nonnegative(self.lu_rank_tolerance, "lu_rank_tolerance")?;
        validate_min_scaling(self.equilibrate_min_scaling)?;
        validate_max_scaling(self.equilibrate_max_scaling)?;
        validate_nonnegative(self.pivot_tolerance, "pivot_tolerance")?;
        validate_threshold(self.pivot_threshold)?;
        validate_nonnegative(self.roundoff_tolerance, "roundoff_tolerance")?;
        validate_nonnegative(self.residual_tolerance, "residual_tolerance")?;
        validate_nonnegative(
            self.iterative_refinement_reltol,
            "iterative_refinement_reltol",
        )?;
        validate_nonnegative(
            self.iterative_refinement_abstol,
            "iterative_refinement_abstol",
        )?;
        validate_stop_ratio(self.iterative_refinement_stop_ratio)?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<T> SaddlePointSettings<T>
where
    T: FloatT + Serialize + DeserializeOwned,
{
    /// Serialize the settings to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Read settings from a JSON string.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SaddlePointSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SaddlePointSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> SaddlePointSettingsBuilder<T>
where
    T: FloatT,
{
    /// check the numerical values that have been set explicitly
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(v) = self.lu_rank_tolerance {
            validate_nonnegative(v, "lu_rank_tolerance")?;
        }
        if let Some(v) = self.equilibrate_min_scaling {
            validate_min_scaling(v)?;
        }
        if let Some(v) = self.equilibrate_max_scaling {
            validate_max_scaling(v)?;
        }
        if let Some(v) = self.pivot_tolerance {
            validate_nonnegative(v, "pivot_tolerance")?;
        }
        if let Some(v) = self.pivot_threshold {
            validate_threshold(v)?;
        }
        if let Some(v) = self.roundoff_tolerance {
            validate_nonnegative(v, "roundoff_tolerance")?;
        }
        if let Some(v) = self.residual_tolerance {
            validate_nonnegative(v, "residual_tolerance")?;
        }
        if let Some(v) = self.iterative_refinement_stop_ratio {
            validate_stop_ratio(v)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_nonnegative<T: FloatT>(v: T, field: &'static str) -> Result<(), SettingsError> {
    if v.is_finite() && v >= T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_min_scaling<T: FloatT>(v: T) -> Result<(), SettingsError> {
    if v > T::zero() && v <= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("equilibrate_min_scaling"))
    }
}

fn validate_max_scaling<T: FloatT>(v: T) -> Result<(), SettingsError> {
    if v.is_finite() && v >= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("equilibrate_max_scaling"))
    }
}

fn validate_threshold<T: FloatT>(v: T) -> Result<(), SettingsError> {
    if v > T::zero() && v <= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("pivot_threshold"))
    }
}

fn validate_stop_ratio<T: FloatT>(v: T) -> Result<(), SettingsError> {
    if v.is_finite() && v >= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(
            "iterative_refinement_stop_ratio",
        ))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    SaddlePointSettingsBuilder::<f64>::default()
        .build()
        .unwrap();

    // fail on out of range threshold
    assert!(SaddlePointSettingsBuilder::<f64>::default()
        .pivot_threshold(1.5)
        .build()
        .is_err());

    // fail on negative tolerance
    assert!(SaddlePointSettingsBuilder::<f64>::default()
        .pivot_tolerance(-1.0)
        .build()
        .is_err());

    // fail on equilibration limits that exclude unit scaling
    assert!(SaddlePointSettingsBuilder::<f64>::default()
        .equilibrate_max_scaling(0.5)
        .build()
        .is_err());
    assert!(SaddlePointSettingsBuilder::<f64>::default()
        .equilibrate_min_scaling(0.0)
        .build()
        .is_err());

    let mut settings = SaddlePointSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    settings.iterative_refinement_stop_ratio = 0.5;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue(
            "iterative_refinement_stop_ratio"
        ))
    );
}

#[test]
fn test_lu_equilibration() {
    let mut settings = SaddlePointSettings::<f64>::default();
    assert_eq!(
        settings.lu_equilibration(),
        Some(EquilibrationSettings {
            max_iter: 10,
            min_scaling: 1e-4,
            max_scaling: 1e4,
        })
    );
    let K = Matrix::from(&[[1e8, 1.0], [1.0, 0.0]]);
    assert!(settings.factorize(&K).unwrap().equilibration().is_some());

    settings.equilibrate_enable = false;
    assert_eq!(settings.lu_equilibration(), None);
    assert!(settings.factorize(&K).unwrap().equilibration().is_none());
}

#[test]
fn test_canonicalizer_settings_defaults() {
    let settings = CanonicalizerSettings::<f64>::default();
    assert_eq!(settings.pivot_tolerance, 1e-10);
    assert_eq!(settings.pivot_threshold, 0.1);
    assert_eq!(settings.roundoff_tolerance, 1e-14);
}

#[cfg(feature = "serde")]
#[test]
fn test_settings_json() {
    let settings = SaddlePointSettingsBuilder::<f64>::default()
        .method(SaddlePointMethod::Rangespace)
        .lu_pivoting(LuPivoting::Partial)
        .iterative_refinement_max_iter(3)
        .build()
        .unwrap();

    let json = settings.to_json().unwrap();
    let settings2 = SaddlePointSettings::<f64>::from_json(&json).unwrap();
    assert_eq!(settings, settings2);

    // missing fields take defaults
    let settings3 = SaddlePointSettings::<f64>::from_json(r#"{"method":"Nullspace"}"#).unwrap();
    assert_eq!(settings3.method, SaddlePointMethod::Nullspace);
    assert_eq!(settings3.residual_tolerance, 1e-12);
}
