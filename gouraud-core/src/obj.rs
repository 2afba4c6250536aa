/// Wavefront OBJ subset parser: `v`, `vn`, `vt`, triangular `f v/t/n`, and
/// `g`/`o` region annotations
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, space0, space1, u64 as index_u64},
    combinator::{map, opt, rest},
    multi::many0_count,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, MeshBuilder};
use crate::math::Vec3;

/// One meaningful line of a mesh description
#[derive(Debug, Clone, PartialEq)]
enum Record<'a> {
    Position(Vec3),
    Normal(Vec3),
    TexCoord(Vec3),
    Face([[usize; 3]; 3]),
    Region(&'a str),
    Skip(&'a str),
}

/// Load and parse a mesh description from disk
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text)?;
    log::info!(
        "loaded {}: {} vertices, {} normals, {} triangles, {} regions",
        path.display(),
        mesh.vertex_count(),
        mesh.normals().len(),
        mesh.triangle_count(),
        mesh.regions().len()
    );
    Ok(mesh)
}

/// Parse a mesh description held in memory
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut builder = MeshBuilder::new();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line, line_no)? {
            Record::Position(p) => builder.position(p),
            Record::Normal(n) => builder.normal(n),
            Record::TexCoord(t) => builder.tex_coord(t),
            Record::Face([v, t, n]) => builder.face(v, t, n),
            Record::Region(name) => builder.begin_region(name),
            Record::Skip(keyword) => {
                log::trace!("line {}: skipping `{}` record", line_no, keyword);
            }
        }
    }

    builder.build()
}

fn parse_line(line: &str, line_no: usize) -> Result<Record<'_>, MeshError> {
    let (body, keyword) = keyword(line).map_err(|e| parse_error(line_no, format!("{e}")))?;

    let parsed = match keyword {
        "v" => map(parse_position, Record::Position)(body),
        "vn" => map(parse_normal, Record::Normal)(body),
        "vt" => map(parse_tex_coord, Record::TexCoord)(body),
        "f" => map(parse_face, Record::Face)(body),
        "g" | "o" => map(parse_name, Record::Region)(body),
        other => return Ok(Record::Skip(other)),
    };

    match parsed {
        Ok((remaining, record)) if remaining.trim().is_empty() => Ok(record),
        Ok((remaining, _)) => Err(parse_error(
            line_no,
            format!("unexpected trailing input `{}` in `{}` record", remaining.trim(), keyword),
        )),
        Err(e) => Err(parse_error(line_no, format!("malformed `{keyword}` record: {e}"))),
    }
}

fn parse_error(line: usize, message: String) -> MeshError {
    MeshError::Parse { line, message }
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vec3> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

/// Extra numbers after the used components (`w`, vertex colours, ...)
fn extra_numbers(input: &str) -> IResult<&str, usize> {
    many0_count(preceded(space1, float))(input)
}

/// `v x y z [w | r g b ...]`; anything past z is dropped
fn parse_position(input: &str) -> IResult<&str, Vec3> {
    let (input, p) = parse_vector3(input)?;
    let (input, _) = extra_numbers(input)?;
    Ok((input, p))
}

fn parse_normal(input: &str) -> IResult<&str, Vec3> {
    let (input, n) = parse_vector3(input)?;
    let (input, _) = extra_numbers(input)?;
    Ok((input, n))
}

/// `vt u [v [w]]`; missing components are 0
fn parse_tex_coord(input: &str) -> IResult<&str, Vec3> {
    let (input, (u, v, w)) = tuple((
        preceded(space1, float),
        opt(preceded(space1, float)),
        opt(preceded(space1, float)),
    ))(input)?;
    let (input, _) = extra_numbers(input)?;
    Ok((input, Vec3::new(u, v.unwrap_or(0.0), w.unwrap_or(0.0))))
}

fn parse_index(input: &str) -> IResult<&str, usize> {
    map(index_u64, |i| i as usize)(input)
}

/// `p/t/n`
fn parse_corner(input: &str) -> IResult<&str, (usize, usize, usize)> {
    let (input, (p, _, t, _, n)) = tuple((
        parse_index,
        char('/'),
        parse_index,
        char('/'),
        parse_index,
    ))(input)?;
    Ok((input, (p, t, n)))
}

/// Three corners, regrouped per attribute: `[positions, textures, normals]`
fn parse_face(input: &str) -> IResult<&str, [[usize; 3]; 3]> {
    let (input, (a, b, c)) = tuple((
        preceded(space1, parse_corner),
        preceded(space1, parse_corner),
        preceded(space1, parse_corner),
    ))(input)?;
    Ok((input, [[a.0, b.0, c.0], [a.1, b.1, c.1], [a.2, b.2, c.2]]))
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    let (input, _) = space0(input)?;
    map(rest, str::trim)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_face_mesh() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvt 0 0\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.faces()[0].position, [0, 1, 2]);
        let n = mesh.averaged_normals()[0];
        assert!((n - Vec3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_whitespace_comments_and_unknown_records() {
        let src = "# pitch\n\n   \nmtllib pitch.mtl\n  v  0 0 0  \nv 1 0 0\nv 0 1 0\ns off\nvn 0 0 1\nvt 0.5 0.5 0\nf 1/1/1   2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.tex_coords()[0], Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_region_annotations() {
        let src = "g turf\nv 0 0 0\nv 1 0 0\no stumps\nv 0 1 0\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.region_id("turf"), Some(0));
        assert_eq!(mesh.vertex_region(1), Some(0));
        assert_eq!(mesh.vertex_region(2), mesh.region_id("stumps"));
    }

    #[test]
    fn test_malformed_record_reports_line() {
        let src = "v 0 0 0\nv 1 zero 0\n";
        match parse_obj(src) {
            Err(MeshError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_vertex_colours_and_extra_components_dropped() {
        let src = "v 0 0 0 1 0 0\nv 1 0 0 0.5 0.5 0.5\nv 0 1 0 1.0\nvn 0 0 1 0\nvt 0.25 0.75 0 9\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.positions()[0], Vec3::zeros());
        assert_eq!(mesh.positions()[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.normals()[0], Vec3::z());
        assert_eq!(mesh.tex_coords()[0], Vec3::new(0.25, 0.75, 0.0));
    }

    #[test]
    fn test_single_component_tex_coord() {
        let src = "v 0 0 0\nvt 0.5\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.tex_coords()[0], Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_non_numeric_tail_still_rejected() {
        let src = "v 0 0 0 red\n";
        assert!(matches!(parse_obj(src), Err(MeshError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_quad_face_rejected() {
        let src = "f 1/1/1 2/1/1 3/1/1 4/1/1\n";
        assert!(matches!(parse_obj(src), Err(MeshError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_face_index_out_of_range() {
        let src = "v 0 0 0\nvn 0 0 1\nvt 0 0\nf 1/1/1 2/1/1 1/1/1\n";
        assert!(matches!(parse_obj(src), Err(MeshError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }
}
