use core::fmt;

use derive_try_from_primitive::TryFromPrimitive;
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::access::DataAccessResult;
use crate::data::Data;

/// Physical unit of a register value.
///
/// Reference: Blue Book, table of units (`unit` enum of `scal_unit_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
#[non_exhaustive]
#[rustfmt::skip]
pub enum Unit {
  Undefined                  =   0,
  Year                       =   1,
  Month                      =   2,
  Week                       =   3,
  Day                        =   4,
  Hour                       =   5,
  Minute                     =   6,
  Second                     =   7,
  Degree                     =   8,
  DegreeCelsius              =   9,
  Currency                   =  10,
  Meter                      =  11,
  MeterPerSecond             =  12,
  CubicMeter                 =  13,
  CubicMeterCorrected        =  14,
  CubicMeterPerHour          =  15,
  CubicMeterPerHourCorrected =  16,
  CubicMeterPerDay           =  17,
  CubicMeterPerDayCorrected  =  18,
  Liter                      =  19,
  Kilogramm                  =  20,
  Newton                     =  21,
  Newtonmeter                =  22,
  Pascal                     =  23,
  Bar                        =  24,
  Joule                      =  25,
  JoulePerHour               =  26,
  Watt                       =  27,
  VoltAmpere                 =  28,
  Var                        =  29,
  WattHour                   =  30,
  VoltAmpereHour             =  31,
  VarHour                    =  32,
  Ampere                     =  33,
  Coulomb                    =  34,
  Volt                       =  35,
  VoltPerMeter               =  36,
  Farad                      =  37,
  Ohm                        =  38,
  OhmMeter                   =  39,
  Weber                      =  40,
  Tesla                      =  41,
  AmperePerMeter             =  42,
  Henry                      =  43,
  Hertz                      =  44,
  InverseWattHour            =  45,
  InverseVarHour             =  46,
  InverseVoltAmpereHour      =  47,
  VoltSquaredHour            =  48,
  AmpereSquaredHour          =  49,
  KilogrammPerSecond         =  50,
  Siemens                    =  51,
  Kelvin                     =  52,
  InverseVoltSquaredHour     =  53,
  InverseAmpereSquaredHour   =  54,
  InverseCubicMeter          =  55,
  Percent                    =  56,
  AmpereHour                 =  57,
  // 58-59 reserved
  WattHourPerCubicMeter      =  60,
  JoulePerCubicMeter         =  61,
  MolePercent                =  62,
  GrammPerCubicMeter         =  63,
  PascalSecond               =  64,
  JoulePerKilogramm          =  65,
  GramPerSquareCentimeter    =  66,
  Atmosphere                 =  67,
  // 68-69 reserved
  DezibelMilliwatt           =  70,
  DezibelMicrovolt           =  71,
  Dezibel                    =  72,
  // 73-127 reserved
  // 128-174 non-SI-units
  // 175-252 reserved
  // 253 extended table of units
  Other                      = 254,
  Count                      = 255,
}

impl Unit {
    #[rustfmt::skip]
    pub fn as_str(&self) -> Option<&'static str> {
    Some(match self {
      Self::Year                       => "a",
      Self::Month                      => "mo",
      Self::Week                       => "wk",
      Self::Day                        => "d",
      Self::Hour                       => "h",
      Self::Minute                     => "min",
      Self::Second                     => "s",
      Self::Degree                     => "°",
      Self::DegreeCelsius              => "°C",
      Self::Currency                   => "currency",
      Self::Meter                      => "m",
      Self::MeterPerSecond             => "m/s",
      Self::CubicMeter                 => "m³",
      Self::CubicMeterCorrected        => "m³",
      Self::CubicMeterPerHour          => "m³/h",
      Self::CubicMeterPerHourCorrected => "m³/h",
      Self::CubicMeterPerDay           => "m³/d",
      Self::CubicMeterPerDayCorrected  => "m³/d",
      Self::Liter                      => "l",
      Self::Kilogramm                  => "kg",
      Self::Newton                     => "N",
      Self::Newtonmeter                => "Nm",
      Self::Pascal                     => "Pa",
      Self::Bar                        => "bar",
      Self::Joule                      => "J",
      Self::JoulePerHour               => "J/h",
      Self::Watt                       => "W",
      Self::VoltAmpere                 => "VA",
      Self::Var                        => "var",
      Self::WattHour                   => "Wh",
      Self::VoltAmpereHour             => "VAh",
      Self::VarHour                    => "varh",
      Self::Ampere                     => "A",
      Self::Coulomb                    => "C",
      Self::Volt                       => "V",
      Self::VoltPerMeter               => "V/m",
      Self::Farad                      => "F",
      Self::Ohm                        => "Ω",
      Self::OhmMeter                   => "Ωm",
      Self::Weber                      => "Wb",
      Self::Tesla                      => "T",
      Self::AmperePerMeter             => "A/m",
      Self::Henry                      => "H",
      Self::Hertz                      => "Hz",
      Self::InverseWattHour            => "1/(Wh)",
      Self::InverseVarHour             => "1/(varh)",
      Self::InverseVoltAmpereHour      => "1/(VAh)",
      Self::VoltSquaredHour            => "V²h",
      Self::AmpereSquaredHour          => "A²h",
      Self::KilogrammPerSecond         => "kg/s",
      Self::Siemens                    => "S",
      Self::Kelvin                     => "K",
      Self::InverseVoltSquaredHour     => "1/(V²h)",
      Self::InverseAmpereSquaredHour   => "1/(A²h)",
      Self::InverseCubicMeter          => "1/m³",
      Self::Percent                    => "%",
      Self::AmpereHour                 => "Ah",
      Self::WattHourPerCubicMeter      => "Wh/m³",
      Self::JoulePerCubicMeter         => "J/m³",
      Self::MolePercent                => "Mol %",
      Self::GrammPerCubicMeter         => "g/m³",
      Self::PascalSecond               => "Pa s",
      Self::JoulePerKilogramm          => "J/kg",
      Self::GramPerSquareCentimeter    => "g/cm²",
      Self::Atmosphere                 => "atm",
      Self::DezibelMilliwatt           => "dBm",
      Self::DezibelMicrovolt           => "dBµV",
      Self::Dezibel                    => "dB",
      Self::Undefined | Self::Other | Self::Count => return None,
    })
  }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.as_str() { s.fmt(f) } else { Ok(()) }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(s) = self.as_str() {
            serializer.serialize_str(s)
        } else {
            serializer.serialize_none()
        }
    }
}

/// Scaler and unit of a register value.
///
/// Encoded as `Structure { Integer(scaler), Enum(unit) }`, so scaler `-2`
/// with unit Wh travels as `02 02 0F FE 16 1E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScalerUnit {
    /// Power of ten applied to the raw value: `value = raw * 10^scaler`.
    pub scaler: i8,
    pub unit: Unit,
}

impl Default for ScalerUnit {
    /// Dimensionless, unscaled: scaler 0, unit `Count`.
    fn default() -> Self {
        Self { scaler: 0, unit: Unit::Count }
    }
}

impl ScalerUnit {
    pub const fn new(scaler: i8, unit: Unit) -> Self {
        Self { scaler, unit }
    }

    /// The multiplier `10^scaler`.
    pub fn factor(&self) -> f64 {
        10f64.powi(i32::from(self.scaler))
    }

    /// Applies the scaler to a raw value.
    ///
    /// A negative scaler divides by the positive power of ten rather than
    /// multiplying by its inverse, so `12345` with scaler `-2` is exactly
    /// `123.45`.
    pub fn apply(&self, raw: f64) -> f64 {
        if self.scaler < 0 {
            raw / 10f64.powi(-i32::from(self.scaler))
        } else {
            raw * self.factor()
        }
    }

    pub fn to_data(&self) -> Data {
        Data::Structure(vec![Data::Integer(self.scaler), Data::Enum(self.unit as u8)])
    }

    pub fn from_data(data: &Data) -> Result<Self, DataAccessResult> {
        match data {
            Data::Structure(elements) => match elements.as_slice() {
                [scaler, Data::Enum(unit)] => {
                    let scaler = scaler
                        .as_i64()
                        .and_then(|s| i8::try_from(s).ok())
                        .ok_or(DataAccessResult::TypeUnmatched)?;
                    let unit = Unit::try_from(*unit).map_err(|_| DataAccessResult::OtherReason)?;
                    Ok(Self { scaler, unit })
                }
                _ => Err(DataAccessResult::TypeUnmatched),
            },
            _ => Err(DataAccessResult::TypeUnmatched),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_valid_units() {
        assert_eq!(Unit::try_from(0).unwrap(), Unit::Undefined);
        assert_eq!(Unit::try_from(27).unwrap(), Unit::Watt);
        assert_eq!(Unit::try_from(30).unwrap(), Unit::WattHour);
        assert_eq!(Unit::try_from(255).unwrap(), Unit::Count);
    }

    #[test]
    fn test_try_from_reserved_units() {
        assert!(Unit::try_from(58).is_err());
        assert!(Unit::try_from(73).is_err());
        assert!(Unit::try_from(200).is_err());
    }

    #[test]
    fn test_display_format() {
        assert_eq!(format!("{}", Unit::Watt), "W");
        assert_eq!(format!("{}", Unit::DegreeCelsius), "°C");
        assert_eq!(format!("{}", Unit::Count), "");
        assert_eq!(format!("{}", Unit::Undefined), "");
    }

    #[test]
    fn test_scaler_unit_to_data() {
        let su = ScalerUnit::new(-2, Unit::Watt);
        assert_eq!(su.to_data(), Data::Structure(vec![Data::Integer(-2), Data::Enum(27)]));
    }

    #[test]
    fn test_scaler_unit_from_data() {
        let data = Data::Structure(vec![Data::Integer(3), Data::Enum(30)]);
        assert_eq!(ScalerUnit::from_data(&data).unwrap(), ScalerUnit::new(3, Unit::WattHour));

        let wrong_arity = Data::Structure(vec![Data::Integer(3)]);
        assert_eq!(ScalerUnit::from_data(&wrong_arity), Err(DataAccessResult::TypeUnmatched));

        let reserved_unit = Data::Structure(vec![Data::Integer(0), Data::Enum(58)]);
        assert_eq!(ScalerUnit::from_data(&reserved_unit), Err(DataAccessResult::OtherReason));

        assert_eq!(ScalerUnit::from_data(&Data::Null), Err(DataAccessResult::TypeUnmatched));
    }

    #[test]
    fn test_scaler_unit_apply() {
        assert_eq!(ScalerUnit::new(-2, Unit::Watt).apply(12345.0), 123.45);
        assert_eq!(ScalerUnit::new(3, Unit::Watt).apply(2.0), 2000.0);
        assert_eq!(ScalerUnit::default().apply(7.0), 7.0);
    }

    #[test]
    fn test_default_is_unscaled_count() {
        let su = ScalerUnit::default();
        assert_eq!(su.scaler, 0);
        assert_eq!(su.unit, Unit::Count);
    }
}
