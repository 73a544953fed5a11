use footprint::FootprintError;

pub fn report_error(err: &FootprintError) {
    match err {
        FootprintError::NoRegionFound => {
            eprintln!("No foot-shaped region found in the image.");
            eprintln!();
            eprintln!("Retake the photo with the whole foot inside the frame and even lighting,");
            eprintln!("or adjust the color band with --hsv-lower / --hsv-upper.");
        }
        FootprintError::ImageLoad { path, source } => {
            eprintln!("Could not read the photo at {}: {source}", path.display());
            eprintln!("Check that the file exists and is a supported image format.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
