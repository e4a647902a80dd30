//! Export helpers for CSV frame logs and JSON session summaries.

pub mod frames {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    /// Column order of the frame log; `track_plot` reads columns by these names.
    pub const HEADER: &str =
        "tick,timestamp,elapsed_s,running,orientation_rad,anomaly_rad,sat_x,sat_y,sat_z";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the frame log header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One row per animation tick.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub tick: u64,
        pub timestamp: &'a str,
        pub elapsed_s: f64,
        pub running: bool,
        pub orientation_rad: f64,
        pub anomaly_rad: f64,
        pub satellite: [f64; 3],
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching [`HEADER`].
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.3},{},{:.9},{:.9},{:.9},{:.9},{:.9}",
                self.tick,
                self.timestamp,
                self.elapsed_s,
                if self.running { "true" } else { "false" },
                self.orientation_rad,
                self.anomaly_rad,
                self.satellite[0],
                self.satellite[1],
                self.satellite[2],
            )
        }
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// End-of-session state written as a JSON sidecar.
    #[derive(Debug, Clone, Serialize)]
    pub struct SessionSummary {
        pub ticks: u64,
        pub running_ticks: u64,
        pub initial_timestamp: String,
        pub final_timestamp: String,
        pub elapsed_s: f64,
        pub orientation_rad: f64,
        pub accumulated_anomaly_rad: f64,
        pub rotation_seed: String,
        pub sun_seed: String,
        pub degraded: bool,
        pub surface_direction: Option<[f64; 3]>,
        pub sun_direction: Option<[f64; 3]>,
    }

    /// Write the summary as pretty-printed JSON, creating parent directories.
    pub fn write_summary(output: &Path, summary: &SessionSummary) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(output)?, summary)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::frames::{HEADER, Record, write_header};

    #[test]
    fn record_columns_match_header() {
        let mut buffer: Vec<u8> = Vec::new();
        write_header(&mut buffer).unwrap();
        Record {
            tick: 3,
            timestamp: "2025-08-17T22:01:00.000Z",
            elapsed_s: 82.5,
            running: true,
            orientation_rad: 0.006,
            anomaly_rad: 0.009,
            satellite: [1.0, 0.0, 0.0],
        }
        .write_to(&mut buffer)
        .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1].split(',').count(),
            HEADER.split(',').count(),
            "row should have one value per column"
        );
        assert!(lines[1].starts_with("3,2025-08-17T22:01:00.000Z,82.500,true,"));
    }
}
