//! Histogram rendering: the caller's score distribution against everyone's.

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::averages::bucket_values;
use crate::dao::Database;
use crate::error::ServiceError;
use crate::puzzle::Bucket;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;
const BIN_WIDTH: i64 = 5;

// Discord-themed palette carried over from the original charts.
const BACKGROUND: RGBColor = RGBColor(0x2F, 0x31, 0x36);
const PANEL: RGBColor = RGBColor(0x40, 0x44, 0x4B);
const TEXT: RGBColor = RGBColor(0xDC, 0xDD, 0xDE);
const EVERYONE: RGBColor = RGBColor(0x94, 0x26, 0x26);
const CALLER: RGBColor = RGBColor(0xF0, 0x47, 0x47);
const EVERYONE_MEAN: RGBColor = RGBColor(0xBB, 0x30, 0x30);
const CALLER_MEAN: RGBColor = RGBColor(0xF4, 0x76, 0x76);

/// Render a PNG density histogram of the bucket's scores, everyone's
/// distribution behind the caller's, with dashed mean lines for both.
///
/// Returns `None` when either population is empty; the caller sends a
/// "no times" message instead of an empty chart.
pub fn render_histogram(
    db: &Database,
    bucket: Bucket,
    user_id: i64,
    user_name: &str,
) -> Result<Option<Vec<u8>>, ServiceError> {
    let everyone = bucket_slice(bucket, bucket_values(&db.all_scores()?));
    let own = bucket_slice(bucket, bucket_values(&db.scores_for_user(user_id)?));
    if everyone.is_empty() || own.is_empty() {
        return Ok(None);
    }

    let png = draw(bucket, &everyone, &own, user_name).map_err(ServiceError::Chart)?;
    Ok(Some(png))
}

fn bucket_slice(bucket: Bucket, (weekday, saturday): (Vec<i64>, Vec<i64>)) -> Vec<i64> {
    match bucket {
        Bucket::Weekday => weekday,
        Bucket::Saturday => saturday,
    }
}

fn bin_range(bucket: Bucket) -> (i64, i64) {
    match bucket {
        Bucket::Weekday => (10, 160),
        Bucket::Saturday => (30, 180),
    }
}

/// Normalized bin heights so the in-range area integrates to one, matching a
/// density histogram.
fn densities(values: &[i64], lo: i64, hi: i64) -> Vec<f64> {
    let bins = ((hi - lo) / BIN_WIDTH) as usize;
    let mut counts = vec![0usize; bins];
    for &value in values {
        if value < lo || value > hi {
            continue;
        }
        let index = (((value - lo) / BIN_WIDTH) as usize).min(bins - 1);
        counts[index] += 1;
    }

    let norm = values.len() as f64 * BIN_WIDTH as f64;
    counts.iter().map(|&count| count as f64 / norm).collect()
}

fn mean(values: &[i64]) -> f64 {
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

fn draw(
    bucket: Bucket,
    everyone: &[i64],
    own: &[i64],
    user_name: &str,
) -> Result<Vec<u8>, String> {
    let (lo, hi) = bin_range(bucket);
    let everyone_heights = densities(everyone, lo, hi);
    let own_heights = densities(own, lo, hi);

    let y_max = everyone_heights
        .iter()
        .chain(&own_heights)
        .copied()
        .fold(0.0f64, f64::max)
        .max(0.001)
        * 1.1;

    let qualifier = match bucket {
        Bucket::Weekday => "",
        Bucket::Saturday => "saturday ",
    };
    let caption = format!("{user_name}'s {qualifier}score histogram");

    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&BACKGROUND).map_err(|err| err.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24).into_font().color(&TEXT))
            .margin(12)
            .x_label_area_size(42)
            .y_label_area_size(56)
            .build_cartesian_2d(lo as f64..hi as f64, 0.0..y_max)
            .map_err(|err| err.to_string())?;

        chart
            .plotting_area()
            .fill(&PANEL)
            .map_err(|err| err.to_string())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(&TEXT)
            .label_style(("sans-serif", 14).into_font().color(&TEXT))
            .x_desc("time (seconds)")
            .y_desc("density")
            .draw()
            .map_err(|err| err.to_string())?;

        chart
            .draw_series(bars(lo, &everyone_heights, EVERYONE))
            .map_err(|err| err.to_string())?
            .label("everyone")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], EVERYONE.filled()));
        chart
            .draw_series(bars(lo, &own_heights, CALLER))
            .map_err(|err| err.to_string())?
            .label(user_name.to_owned())
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], CALLER.filled()));

        for (values, color) in [(everyone, EVERYONE_MEAN), (own, CALLER_MEAN)] {
            let x = mean(values);
            chart
                .draw_series(DashedLineSeries::new(
                    [(x, 0.0), (x, y_max)],
                    8,
                    4,
                    color.stroke_width(2),
                ))
                .map_err(|err| err.to_string())?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .label_font(("sans-serif", 14).into_font().color(&TEXT))
            .draw()
            .map_err(|err| err.to_string())?;

        root.present().map_err(|err| err.to_string())?;
    }

    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| "histogram buffer size mismatch".to_owned())?;
    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|err| err.to_string())?;
    Ok(png)
}

fn bars(lo: i64, heights: &[f64], color: RGBColor) -> Vec<Rectangle<(f64, f64)>> {
    heights
        .iter()
        .enumerate()
        .map(|(index, &height)| {
            let left = (lo + index as i64 * BIN_WIDTH) as f64;
            Rectangle::new([(left, 0.0), (left + BIN_WIDTH as f64, height)], color.filled())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::dao::ScoreRecord;

    fn add_score(db: &Database, user_id: i64, date: NaiveDate, seconds: i64) {
        db.upsert_score(&ScoreRecord {
            user_id,
            name: "solver".into(),
            date,
            seconds,
        })
        .unwrap();
    }

    #[test]
    fn no_data_yields_none_instead_of_a_chart() {
        let db = Database::open_in_memory().unwrap();
        assert!(
            render_histogram(&db, Bucket::Weekday, 1, "solver")
                .unwrap()
                .is_none()
        );

        // Someone else has scores, but the caller still has none.
        add_score(&db, 2, NaiveDate::from_ymd_opt(2021, 3, 3).unwrap(), 70);
        assert!(
            render_histogram(&db, Bucket::Weekday, 1, "solver")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn bucket_with_no_scores_yields_none() {
        let db = Database::open_in_memory().unwrap();
        // Weekday score only; the Saturday histogram has nothing to show.
        add_score(&db, 1, NaiveDate::from_ymd_opt(2021, 3, 3).unwrap(), 70);
        assert!(
            render_histogram(&db, Bucket::Saturday, 1, "solver")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn densities_normalize_over_in_range_width() {
        // Four values in one bin: density count / (n * width) = 0.2 there.
        let heights = densities(&[12, 12, 13, 14], 10, 160);
        assert!((heights[0] - 0.2).abs() < 1e-9);
        assert!(heights[1..].iter().all(|&h| h == 0.0));
    }

    #[test]
    fn out_of_range_values_are_dropped() {
        let heights = densities(&[5, 500], 10, 160);
        assert!(heights.iter().all(|&h| h == 0.0));
    }
}
