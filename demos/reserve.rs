use range_bitmap::{RangeBitmap, RangeError};

/// Finds the first free range of `span` bits with a first-fit scan and claims it.
fn reserve(bitmap: &mut RangeBitmap, span: usize) -> Result<Option<usize>, RangeError> {
    if span > bitmap.len() {
        return Ok(None);
    }
    for start in 0..=bitmap.len() - span {
        if bitmap.try_set_range(start, span)? {
            return Ok(Some(start));
        }
    }
    Ok(None)
}

fn main() -> Result<(), RangeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();

    let mut bitmap: RangeBitmap = RangeBitmap::new(129);
    bitmap.try_set_range(0, 3)?;
    println!("{bitmap}");
    bitmap.try_set_range(63, 7)?;
    println!("{bitmap}");
    let succeeded = bitmap.try_set_range(64, 65)?;
    println!("{bitmap}{succeeded}");

    for span in [20, 40, 50] {
        match reserve(&mut bitmap, span)? {
            Some(start) => println!("reserved [{start}, {})", start + span),
            None => println!("no room for {span} bits"),
        }
    }

    let (zeros, ones) = bitmap.section_counts();
    println!(
        "{zeros} free sections, {ones} occupied sections ({} ranges committed)",
        bitmap.committed_sections()
    );
    println!("{bitmap:?}");

    if let Err(err) = bitmap.try_set_range(128, 2) {
        println!("{err}");
    }
    Ok(())
}
