use sm_core::{Image, ImageView};

const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const DIRS_C4: [u8; 4] = [0, 2, 4, 6];
const DIRS_C8: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    C4,
    #[default]
    C8,
}

/// Component labeling of a mask. `labels` holds `0` for background and
/// `1..=count` for foreground pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    pub labels: Image<u32>,
    pub count: u32,
}

/// Labels connected regions of non-background pixels.
///
/// Any value other than `L::default()` is foreground, regardless of class:
/// touching pixels of different classes share a component. Components are
/// numbered in raster order of their first pixel.
pub fn connected_components<L: Copy + PartialEq + Default>(
    mask: &ImageView<'_, L>,
    connectivity: Connectivity,
) -> Components {
    let (width, height) = mask.dims();
    let background = L::default();
    let foreground: Vec<bool> = mask.rows().flatten().map(|v| *v != background).collect();

    let mut labels = vec![0u32; foreground.len()];
    let mut count = 0u32;
    let mut stack = Vec::new();
    let dirs = dirs_for(connectivity);

    for start in 0..foreground.len() {
        if !foreground[start] || labels[start] != 0 {
            continue;
        }

        count += 1;
        labels[start] = count;
        stack.push(start);

        while let Some(p) = stack.pop() {
            for &dir in dirs {
                let Some(q) = neighbor_index(p, dir, width, height) else {
                    continue;
                };
                if foreground[q] && labels[q] == 0 {
                    labels[q] = count;
                    stack.push(q);
                }
            }
        }
    }

    tracing::debug!(count, "labeled connected components");

    Components {
        labels: Image::from_vec(width, height, labels)
            .expect("label buffer matches mask dimensions"),
        count,
    }
}

fn dirs_for(connectivity: Connectivity) -> &'static [u8] {
    match connectivity {
        Connectivity::C4 => &DIRS_C4,
        Connectivity::C8 => &DIRS_C8,
    }
}

fn neighbor_index(p: usize, dir: u8, width: usize, height: usize) -> Option<usize> {
    let x = (p % width) as isize + DX[dir as usize];
    let y = (p / width) as isize + DY[dir as usize];
    if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
        return None;
    }
    Some(y as usize * width + x as usize)
}
