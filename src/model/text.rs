use glam::Vec3;

use crate::utils::Mesh;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
const GLYPH_SPACING: usize = 1;

type Glyph = [u8; GLYPH_HEIGHT];

/// Rows top to bottom, bit 4 is the leftmost column
fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        ' ' => [0; GLYPH_HEIGHT],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}

/// Lit cells of a whole string laid out left to right
struct CellGrid {
    columns: usize,
    cells: Vec<bool>,
}

impl CellGrid {
    fn layout(text: &str) -> Self {
        let glyphs: Vec<Glyph> = text.chars().map(glyph).collect();
        let columns = (glyphs.len() * (GLYPH_WIDTH + GLYPH_SPACING)).saturating_sub(GLYPH_SPACING);
        let mut cells = vec![false; columns * GLYPH_HEIGHT];
        for (g, rows) in glyphs.iter().enumerate() {
            let x0 = g * (GLYPH_WIDTH + GLYPH_SPACING);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        cells[row * columns + x0 + col] = true;
                    }
                }
            }
        }
        Self { columns, cells }
    }

    /// `row` counts from the top; out of range reads as empty
    fn lit(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 || col as usize >= self.columns || row as usize >= GLYPH_HEIGHT {
            return false;
        }
        self.cells[row as usize * self.columns + col as usize]
    }
}

/// Build the text mesh with cap height `size` and extrusion `depth`, centred on the origin.
/// Each lit font cell becomes a box; faces shared with a lit neighbour are skipped.
pub fn text_mesh(text: &str, size: f32, depth: f32) -> Mesh {
    let grid = CellGrid::layout(text);
    let cell = size / GLYPH_HEIGHT as f32;
    let mut mesh = Mesh::empty();

    for row in 0..GLYPH_HEIGHT as isize {
        for col in 0..grid.columns as isize {
            if !grid.lit(col, row) {
                continue;
            }
            let x0 = col as f32 * cell;
            let x1 = x0 + cell;
            let y0 = (GLYPH_HEIGHT as isize - 1 - row) as f32 * cell;
            let y1 = y0 + cell;
            let (z0, z1) = (0.0, depth);

            mesh.push_quad(
                [Vec3::new(x0, y0, z1), Vec3::new(x1, y0, z1), Vec3::new(x1, y1, z1), Vec3::new(x0, y1, z1)],
                Vec3::Z,
            );
            mesh.push_quad(
                [Vec3::new(x0, y0, z0), Vec3::new(x0, y1, z0), Vec3::new(x1, y1, z0), Vec3::new(x1, y0, z0)],
                Vec3::NEG_Z,
            );
            if !grid.lit(col - 1, row) {
                mesh.push_quad(
                    [Vec3::new(x0, y0, z0), Vec3::new(x0, y0, z1), Vec3::new(x0, y1, z1), Vec3::new(x0, y1, z0)],
                    Vec3::NEG_X,
                );
            }
            if !grid.lit(col + 1, row) {
                mesh.push_quad(
                    [Vec3::new(x1, y0, z0), Vec3::new(x1, y1, z0), Vec3::new(x1, y1, z1), Vec3::new(x1, y0, z1)],
                    Vec3::X,
                );
            }
            // rows grow downwards, so the cell below is row + 1
            if !grid.lit(col, row + 1) {
                mesh.push_quad(
                    [Vec3::new(x0, y0, z0), Vec3::new(x1, y0, z0), Vec3::new(x1, y0, z1), Vec3::new(x0, y0, z1)],
                    Vec3::NEG_Y,
                );
            }
            if !grid.lit(col, row - 1) {
                mesh.push_quad(
                    [Vec3::new(x0, y1, z0), Vec3::new(x0, y1, z1), Vec3::new(x1, y1, z1), Vec3::new(x1, y1, z0)],
                    Vec3::Y,
                );
            }
        }
    }

    mesh.center();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(text_mesh("", 0.5, 0.2).is_empty());
        assert!(text_mesh("   ", 0.5, 0.2).is_empty());
    }

    #[test]
    fn test_dot_culls_shared_faces() {
        // 2x2 block: 4 front + 4 back + 8 perimeter side quads
        let mesh = text_mesh(".", 0.7, 0.2);
        assert_eq!(mesh.vertices.len(), 16 * 4);
        assert_eq!(mesh.indices.len(), 16 * 6);
    }

    #[test]
    fn test_full_height_glyph_extent() {
        let mesh = text_mesh("E", 0.5, 0.2);
        let (min, max) = mesh.bounds();
        let extent = max - min;
        assert!((extent.y - 0.5).abs() < 1e-5);
        assert!((extent.z - 0.2).abs() < 1e-5);
        assert!((extent.x - 0.5 * 5.0 / 7.0).abs() < 1e-5);
        assert!((min + max).length() < 1e-5);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(text_mesh("abc", 0.5, 0.2).vertices, text_mesh("ABC", 0.5, 0.2).vertices);
    }

    #[test]
    fn test_side_faces_wind_outward() {
        let mesh = text_mesh("O", 0.5, 0.2);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let geometric = (Vec3::from_array(b.pos) - Vec3::from_array(a.pos))
                .cross(Vec3::from_array(c.pos) - Vec3::from_array(a.pos))
                .normalize();
            assert!(geometric.dot(Vec3::from_array(a.normal)) > 0.99);
        }
    }
}
