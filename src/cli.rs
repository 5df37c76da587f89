// DistWatch - Simulator Command Line

use clap::{Parser, ValueEnum};

use crate::config::{FaceConfig, CLASSIC_FACE, METERS_PER_KILOMETER, SIM_DURATION_S, TIMECHART_FACE};

/// Walk a simulated wearer around the block and log what the watch shows.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// watch face to simulate
    #[arg(value_enum, default_value = "timechart")]
    pub face: Face,

    /// length of the walk in minutes
    #[arg(default_value_t = SIM_DURATION_S / 60)]
    pub minutes: i64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Face {
    Timechart,
    Classic,
}

impl Face {
    pub fn config(self) -> FaceConfig {
        match self {
            Self::Timechart => TIMECHART_FACE,
            Self::Classic => CLASSIC_FACE,
        }
    }
}

impl Args {
    pub fn duration_s(&self) -> i64 {
        self.minutes * 60
    }

    /// Up presses that set a one kilometer goal on the chosen face.
    pub fn goal_clicks(&self) -> u32 {
        (METERS_PER_KILOMETER / self.face.config().goal_step) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_twenty_minute_timechart_walk() {
        let args = Args::try_parse_from(["distwatch"]).unwrap();
        assert_eq!(args.face, Face::Timechart);
        assert_eq!(args.duration_s(), SIM_DURATION_S);
        assert_eq!(args.goal_clicks(), 10);
    }

    #[test]
    fn classic_face_and_duration() {
        let args = Args::try_parse_from(["distwatch", "classic", "5"]).unwrap();
        assert_eq!(args.face.config(), CLASSIC_FACE);
        assert_eq!(args.duration_s(), 300);
        assert_eq!(args.goal_clicks(), 2);
    }

    #[test]
    fn rejects_unknown_face_and_bad_duration() {
        assert!(Args::try_parse_from(["distwatch", "digital"]).is_err());
        assert!(Args::try_parse_from(["distwatch", "classic", "ten"]).is_err());
    }
}
