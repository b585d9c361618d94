use std::io::Cursor;

use base64::Engine;
use qistyle::composer::Layout;
use qistyle::helper::encode;
use qistyle::image_size::{calculate_image_size, max_hidden_axis_dots, max_hidden_dots};
use qistyle::scene::{Figure, Node, Shape};
use qistyle::{
    BitMatrix, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel, ExportFormat, ModuleMatrix, QrStyleError,
    QrSvg, RenderOptions, Scene,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn version_one() -> BitMatrix {
    let qr = encode("HELLO", ErrorCorrectionLevel::H, 1).unwrap();
    BitMatrix::from_matrix(&qr)
}

fn transpose(matrix: &BitMatrix) -> BitMatrix {
    BitMatrix::from_fn(matrix.module_count(), |row, col| matrix.is_dark(col, row))
}

fn group<'s>(scene: &'s Scene, class: &str) -> &'s [Figure] {
    scene
        .children
        .iter()
        .find_map(|node| match node {
            Node::Group { class: c, figures } if c == class => Some(figures.as_slice()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no group {class}"))
}

fn in_finder(row: usize, col: usize, count: usize) -> bool {
    let far = count - 7;
    (row < 7 && col < 7) || (row < 7 && col >= far) || (row >= far && col < 7)
}

/// Grid cell of a square module figure drawn at `dot` px from the origin.
fn cell(figure: &Figure, dot: f64) -> (usize, usize) {
    match figure.shape {
        Shape::Rect { x, y, width, .. } => {
            assert_eq!(width, dot);
            ((y / dot) as usize, (x / dot) as usize)
        }
        ref other => panic!("expected a square module, got {other:?}"),
    }
}

fn logo_data_uri(width: u32, height: u32) -> String {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(buf))
}

fn square_options() -> RenderOptions {
    let mut options = RenderOptions { width: 210, height: 210, margin: 0, ..Default::default() };
    options.dots_options.kind = DotType::Square;
    options.dots_options.color = Some("#111".into());
    options
}

#[test]
fn test_square_modules_and_finder_regions() {
    init_tracing();
    let matrix = version_one();
    let mut options = square_options();
    options.corners_square_options.kind = Some(CornerSquareType::Square);
    options.corners_square_options.color = Some("#a00".into());
    options.corners_dot_options.kind = Some(CornerDotType::Square);

    let layout = Layout::compute(210, 210, 0, 21).unwrap();
    assert_eq!(layout.dot_size, 10.0);

    let mut qr = QrSvg::new();
    let scene = qr.render(&matrix, options).unwrap();

    let dots = group(scene, "dot-color");
    let expected = (0..21)
        .flat_map(|row| (0..21).map(move |col| (row, col)))
        .filter(|&(row, col)| matrix.is_dark(row, col) && !in_finder(row, col, 21))
        .count();
    assert_eq!(dots.len(), expected);
    for figure in dots {
        let (row, col) = cell(figure, 10.0);
        assert!(!in_finder(row, col, 21), "module pass drew inside a finder at {row},{col}");
        assert!(matrix.is_dark(row, col));
    }

    for (suffix, (x0, y0)) in [("0-0", (0.0, 0.0)), ("1-0", (140.0, 0.0)), ("0-1", (0.0, 140.0))] {
        let corner = group(scene, &format!("corners-square-color-{suffix}"));
        assert_eq!(corner.len(), 2, "ring and center for corner {suffix}");
        let center = (x0 + 35.0, y0 + 35.0);
        match &corner[0].shape {
            Shape::Path { d, even_odd } => {
                assert!(even_odd);
                assert!(d.starts_with(&format!("M {} {}", x0, y0)));
            }
            other => panic!("expected ring path, got {other:?}"),
        }
        assert_eq!(
            corner[1].shape,
            Shape::Rect { x: x0 + 20.0, y: y0 + 20.0, width: 30.0, height: 30.0 }
        );
        for figure in corner {
            if let Some(rotation) = figure.rotation {
                assert_eq!((rotation.cx, rotation.cy), center);
            }
        }
    }
}

#[test]
fn test_logo_hides_within_budget_and_is_centered() {
    init_tracing();
    let matrix = version_one();
    let mut options = square_options();
    options.image = Some(logo_data_uri(64, 64));
    options.image_options.image_size = 0.3;
    options.qr_options.error_correction_level = ErrorCorrectionLevel::H;

    let budget = max_hidden_dots(0.3, ErrorCorrectionLevel::H, 21);
    assert_eq!(budget, 39);
    let size = calculate_image_size(64.0, 64.0, budget, max_hidden_axis_dots(21), 10.0);
    assert!(u64::from(size.hidden_columns * size.hidden_rows) <= budget);

    let mut qr = QrSvg::new();
    let scene = qr.render(&matrix, options).unwrap();

    let column_start = (21 - size.hidden_columns as usize) / 2;
    let row_start = (21 - size.hidden_rows as usize) / 2;
    let hidden = |row: usize, col: usize| {
        (row_start..row_start + size.hidden_rows as usize).contains(&row)
            && (column_start..column_start + size.hidden_columns as usize).contains(&col)
    };
    let dots = group(scene, "dot-color");
    for figure in &dots[..] {
        let (row, col) = cell(figure, 10.0);
        if !in_finder(row, col, 21) {
            assert!(!hidden(row, col), "module drawn under the logo at {row},{col}");
        }
    }

    let image = scene
        .children
        .iter()
        .find_map(|node| match node {
            Node::Image(image) => Some(image),
            _ => None,
        })
        .expect("logo node");
    assert_eq!(image.x + image.width / 2.0, 105.0);
    assert_eq!(image.y + image.height / 2.0, 105.0);
    assert_eq!((image.width, image.height), (size.width, size.height));
}

#[test]
fn test_rendering_is_deterministic() {
    let matrix = version_one();
    let mut options = square_options();
    options.dots_options.kind = DotType::ExtraRounded;
    options.image = Some(logo_data_uri(30, 20));

    let mut first = QrSvg::new();
    let a = first.render(&matrix, options.clone()).unwrap().to_svg();
    let b = first.update(options.clone()).unwrap().to_svg();
    assert_eq!(a, b);

    // A second instance differs only by its uid.
    let mut second = QrSvg::new();
    let c = second.render(&matrix, options).unwrap().to_svg();
    assert_ne!(first.uid(), second.uid());
    assert_eq!(a.replace(&first.uid(), "uid"), c.replace(&second.uid(), "uid"));
}

#[test]
fn test_legacy_rotation_draws_the_transpose() {
    let matrix = version_one();
    let mut options = square_options();
    options.dots_options.kind = DotType::Classy;

    let mut qr = QrSvg::new();
    let modern = group(qr.render(&transpose(&matrix), options.clone()).unwrap(), "dot-color").to_vec();
    options.use_legacy_dot_rotation = true;
    let legacy = group(qr.render(&matrix, options).unwrap(), "dot-color").to_vec();
    assert_eq!(modern, legacy);
}

#[test]
fn test_canvas_too_small() {
    let mut qr = QrSvg::new();
    let options = RenderOptions { width: 60, height: 400, margin: 20, ..Default::default() };
    match qr.render(&version_one(), options) {
        Err(QrStyleError::CanvasTooSmall { count, available }) => assert_eq!((count, available), (21, 20)),
        other => panic!("expected CanvasTooSmall, got {other:?}"),
    }
}

#[test]
fn test_missing_logo_renders_without_it() {
    init_tracing();
    let matrix = version_one();
    let mut options = square_options();
    options.image = Some("does/not/exist.png".into());

    let mut qr = QrSvg::new();
    let scene = qr.render(&matrix, options).unwrap();
    assert!(!scene.children.iter().any(|node| matches!(node, Node::Image(_))));
    let drawn = group(scene, "dot-color")
        .iter()
        .map(|figure| cell(figure, 10.0))
        .filter(|&(row, col)| !in_finder(row, col, 21))
        .count();
    let dark = (0..21)
        .flat_map(|row| (0..21).map(move |col| (row, col)))
        .filter(|&(row, col)| matrix.is_dark(row, col) && !in_finder(row, col, 21))
        .count();
    assert_eq!(drawn, dark);
}

#[test]
fn test_json_options_to_png() {
    let options = RenderOptions::from_json(
        r##"{
            "width": 250,
            "height": 250,
            "margin": 10,
            "dotsOptions": { "type": "dots", "gradient": {
                "type": "radial",
                "colorStops": [{ "offset": 0, "color": "#000" }, { "offset": 1, "color": "#333" }]
            } },
            "cornersSquareOptions": { "type": "dot", "color": "#000" },
            "backgroundOptions": { "color": "#ffffff" }
        }"##,
    )
    .unwrap();
    let mut qr = QrSvg::new();
    qr.render(&version_one(), options).unwrap();

    let svg = qr.to_svg().unwrap();
    assert!(svg.contains("radialGradient"));
    assert!(svg.contains(&format!("clip-path=\"url(#{}-clip-path-dot-color)\"", qr.uid())));

    let png = qr.export(ExportFormat::Png).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (250, 250));
    assert_eq!(img.get_pixel(3, 3).0, [255, 255, 255, 255]);
}
