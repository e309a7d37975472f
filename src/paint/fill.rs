use super::color::Color;
use super::raster::Raster;

/// Flood-fill the 4-connected region of pixels sharing the colour at (x, y).
///
/// Runs as an iterative scanline fill with an explicit stack, then softens the
/// edge: any unfilled pixel with at least two filled 4-neighbours is painted too,
/// which closes the gaps left around anti-aliased outlines.
///
/// Returns false without touching the raster when the start point is outside
/// the raster or already has the fill colour.
pub fn flood_fill(raster: &mut Raster, x: i32, y: i32, fill: Color) -> bool {
    let Some(target) = raster.pixel(x, y) else {
        return false;
    };
    if target == fill {
        return false;
    }

    let width = raster.width() as i32;
    let height = raster.height() as i32;
    let index = |x: i32, y: i32| (y * width + x) as usize;
    let mut visited = vec![false; (width * height) as usize];
    let mut stack = vec![(x, y)];

    while let Some((sx, sy)) = stack.pop() {
        if visited[index(sx, sy)] || raster.pixel(sx, sy) != Some(target) {
            continue;
        }

        // Widen to the full run on this row
        let mut left = sx;
        while left > 0 && !visited[index(left - 1, sy)] && raster.pixel(left - 1, sy) == Some(target)
        {
            left -= 1;
        }
        let mut right = sx;
        while right < width - 1
            && !visited[index(right + 1, sy)]
            && raster.pixel(right + 1, sy) == Some(target)
        {
            right += 1;
        }

        for run_x in left..=right {
            visited[index(run_x, sy)] = true;
            raster.set_pixel(run_x, sy, fill);

            for ny in [sy - 1, sy + 1] {
                if ny >= 0
                    && ny < height
                    && !visited[index(run_x, ny)]
                    && raster.pixel(run_x, ny) == Some(target)
                {
                    stack.push((run_x, ny));
                }
            }
        }
    }

    let filled_neighbours = |px: i32, py: i32| {
        [(px - 1, py), (px + 1, py), (px, py - 1), (px, py + 1)]
            .into_iter()
            .filter(|&(nx, ny)| nx >= 0 && ny >= 0 && nx < width && ny < height)
            .filter(|&(nx, ny)| visited[index(nx, ny)])
            .count()
    };
    let edge: Vec<(i32, i32)> = (0..height)
        .flat_map(|py| (0..width).map(move |px| (px, py)))
        .filter(|&(px, py)| !visited[index(px, py)] && filled_neighbours(px, py) >= 2)
        .collect();
    for (px, py) in edge {
        raster.set_pixel(px, py, fill);
    }

    true
}
