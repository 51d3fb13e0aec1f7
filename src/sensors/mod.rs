//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`SensorSnapshot`]
//! per sampling cycle.  The snapshot is handed to the decision engine as a
//! whole; a driver that cannot produce a reading reports the NaN fault
//! sentinel for its field rather than a fake zero.

pub mod analog;
pub mod climate;
pub mod color;
pub mod compost_temp;
pub mod fill;
pub mod load;

use analog::AnalogFrontEnd;
use climate::ClimateSensor;
use color::ColorSensor;
use compost_temp::CompostTempSensor;
use fill::FillLevelSensor;
use load::LoadCellSensor;

use crate::engine::snapshot::SensorSnapshot;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub analog: AnalogFrontEnd,
    pub compost_temp: CompostTempSensor,
    pub climate: ClimateSensor,
    pub load: LoadCellSensor,
    pub fill: FillLevelSensor,
    pub color: ColorSensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        analog: AnalogFrontEnd,
        compost_temp: CompostTempSensor,
        climate: ClimateSensor,
        load: LoadCellSensor,
        fill: FillLevelSensor,
        color: ColorSensor,
    ) -> Self {
        Self {
            analog,
            compost_temp,
            climate,
            load,
            fill,
            color,
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures surface as NaN in the affected fields — a
    /// single flaky sensor must not block the rest of the cycle.
    pub fn read_all(&mut self) -> SensorSnapshot {
        let analog = self.analog.read();
        let compost_temp_c = self.compost_temp.read();
        let climate = self.climate.read();
        let (r, g, b) = self.color.read();

        SensorSnapshot {
            soil_moisture_pct: analog.soil_moisture_pct,
            compost_temp_c,
            air_temp_c: climate.temp_c,
            air_humidity_pct: climate.humidity_pct,
            ph: analog.ph,
            gas_raw: analog.gas_raw,
            conductivity_raw: analog.conductivity_raw,
            load_mass_g: self.load.read_grams(),
            fill_distance_cm: self.fill.read_cm(),
            color_rgb: (r, g, b),
        }
    }
}
