use footprint::{FootprintResult, Segment};
use imageproc::point::Point;

use crate::cli::{GlobalOptions, LandmarksCommand};

use super::utils::build_footprint;

/// The main function to run the landmarks command.
pub fn run(global: &GlobalOptions, cmd: LandmarksCommand) -> FootprintResult<()> {
    let footprint = build_footprint(global);
    let landmarks = footprint.landmarks(cmd.input.as_path(), cmd.side.into())?;

    println!("heel        {}", point(landmarks.heel));
    println!("big toe     {}", point(landmarks.big_toe));
    println!("little toe  {}", point(landmarks.little_toe));
    println!("arch line   {}", segment(landmarks.arch_line()));
    println!("heel line   {}", segment(landmarks.heel_line));
    println!("metatarsal  {}", segment(landmarks.metatarsal));

    Ok(())
}

fn point(p: Point<i32>) -> String {
    format!("({}, {})", p.x, p.y)
}

fn segment(s: Segment) -> String {
    format!("{} -> {}  width {}", point(s.start), point(s.end), s.width())
}
