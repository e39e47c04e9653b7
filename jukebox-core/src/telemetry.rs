//! Last-known host telemetry
//!
//! Written only by the link state machine while parsing data messages; read
//! by the display. A failed parse leaves every field untouched.

use jukebox_protocol::{parse_fixed_fields, DataKind, Field, FieldError, FieldSink, FIELD_DELIMITER};

/// Capacity of hardware name fields
pub const NAME_CAPACITY: usize = 48;

/// Capacity of numeric reading fields
pub const VALUE_CAPACITY: usize = 10;

pub type NameField = Field<NAME_CAPACITY>;
pub type ValueField = Field<VALUE_CAPACITY>;

/// Telemetry fields received from the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    // Identity, captured once per session
    pub cpu_name: NameField,
    pub gpu_name: NameField,
    pub ram_count: ValueField,

    // Readings, refreshed every cycle
    pub cpu_freq: ValueField,
    pub cpu_temp: ValueField,
    pub cpu_load: ValueField,
    pub ram_used: ValueField,
    pub gpu_temp: ValueField,
    pub gpu_core_clock: ValueField,
    pub gpu_core_load: ValueField,
    pub gpu_vram_clock: ValueField,
    pub gpu_vram_load: ValueField,
}

impl Telemetry {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            cpu_name: Field::new(),
            gpu_name: Field::new(),
            ram_count: Field::new(),
            cpu_freq: Field::new(),
            cpu_temp: Field::new(),
            cpu_load: Field::new(),
            ram_used: Field::new(),
            gpu_temp: Field::new(),
            gpu_core_clock: Field::new(),
            gpu_core_load: Field::new(),
            gpu_vram_clock: Field::new(),
            gpu_vram_load: Field::new(),
        }
    }

    /// Apply a data message payload
    ///
    /// Identity payloads carry CPU name, GPU name and RAM capacity. Stats
    /// payloads carry CPU frequency, temperature and load, RAM used, then GPU
    /// temperature, core clock, core load, VRAM clock and VRAM load.
    pub fn apply(&mut self, kind: DataKind, payload: &[u8]) -> Result<(), FieldError> {
        match kind {
            DataKind::Identity => parse_fixed_fields(
                payload,
                FIELD_DELIMITER,
                &mut [&mut self.cpu_name, &mut self.gpu_name, &mut self.ram_count],
            ),
            DataKind::Stats => parse_fixed_fields(
                payload,
                FIELD_DELIMITER,
                &mut [
                    &mut self.cpu_freq,
                    &mut self.cpu_temp,
                    &mut self.cpu_load,
                    &mut self.ram_used,
                    &mut self.gpu_temp,
                    &mut self.gpu_core_clock,
                    &mut self.gpu_core_load,
                    &mut self.gpu_vram_clock,
                    &mut self.gpu_vram_load,
                ],
            ),
        }
    }

    /// Empty every field
    pub fn clear(&mut self) {
        let sinks: [&mut dyn FieldSink; 12] = [
            &mut self.cpu_name,
            &mut self.gpu_name,
            &mut self.ram_count,
            &mut self.cpu_freq,
            &mut self.cpu_temp,
            &mut self.cpu_load,
            &mut self.ram_used,
            &mut self.gpu_temp,
            &mut self.gpu_core_clock,
            &mut self.gpu_core_load,
            &mut self.gpu_vram_clock,
            &mut self.gpu_vram_load,
        ];
        for sink in sinks {
            sink.clear();
        }
    }

    /// Whether every field is empty
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use jukebox_protocol::messages::encode_data;

    fn payload(kind: DataKind, values: &[&str]) -> Vec<u8, 128> {
        // Strip the three byte header; the codec works on the field section
        let line: Vec<u8, 128> = encode_data(kind, values).unwrap();
        Vec::from_slice(&line[3..]).unwrap()
    }

    #[test]
    fn test_apply_identity() {
        let mut t = Telemetry::new();
        let p = payload(DataKind::Identity, &["AMD Ryzen 9", "NVIDIA RTX 4080", "64GB"]);
        t.apply(DataKind::Identity, &p).unwrap();

        assert_eq!(t.cpu_name, "AMD Ryzen 9");
        assert_eq!(t.gpu_name, "NVIDIA RTX 4080");
        assert_eq!(t.ram_count, "64GB");
        assert!(t.cpu_freq.is_empty());
    }

    #[test]
    fn test_apply_stats_order() {
        let mut t = Telemetry::new();
        let p = payload(
            DataKind::Stats,
            &["4.70", "65", "12", "18.2", "54", "2505", "33", "10501", "21"],
        );
        t.apply(DataKind::Stats, &p).unwrap();

        assert_eq!(t.cpu_freq, "4.70");
        assert_eq!(t.cpu_temp, "65");
        assert_eq!(t.cpu_load, "12");
        assert_eq!(t.ram_used, "18.2");
        assert_eq!(t.gpu_temp, "54");
        assert_eq!(t.gpu_core_clock, "2505");
        assert_eq!(t.gpu_core_load, "33");
        assert_eq!(t.gpu_vram_clock, "10501");
        assert_eq!(t.gpu_vram_load, "21");
    }

    #[test]
    fn test_failed_apply_keeps_previous() {
        let mut t = Telemetry::new();
        let p = payload(DataKind::Identity, &["A", "B", "C"]);
        t.apply(DataKind::Identity, &p).unwrap();
        let before = t.clone();

        // Identity payload handed to the stats parser: 3 fields, 9 expected
        assert!(t.apply(DataKind::Stats, &p).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut t = Telemetry::new();
        let p = payload(DataKind::Identity, &["A", "B", "C"]);
        t.apply(DataKind::Identity, &p).unwrap();

        t.clear();
        assert!(t.is_empty());
        t.clear();
        assert!(t.is_empty());
    }
}
