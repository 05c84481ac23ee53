use std::path::{Path, PathBuf};

use image::Rgba;
use lettering::color::DEFAULT_FILL;
use lettering::render::{save_png, BACKGROUND};
use lettering::{
    build_color_map, Configuration, Dialect, ErrorKind, FontResource, LayoutPlan,
    MetricsProvider as _, Pipeline, RasterRenderer, Renderer as _,
};

/// A reduction of DejaVu Sans to the space and the letters `A` to `Z`, with 2048 units per em.
fn fixture_font() -> FontResource {
    FontResource::from_path(&fixture_path("LetteringFixture.ttf")).unwrap()
}

/// The same font with a `COLR` table: `I` is red then blue, `B` starts with the foreground
/// color and `C` points past the end of the palette.
fn color_fixture_font() -> FontResource {
    FontResource::from_path(&fixture_path("LetteringFixture-Color.ttf")).unwrap()
}

fn fixture_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file_name)
}

/// The center of the stem of the `I` on the first line of the plan, in canvas pixels.
fn stem_center(font: &FontResource, plan: &LayoutPlan) -> (u32, u32) {
    let line = &plan.lines[0];
    let font_metrics = font.font_metrics();
    let scale = font_metrics.scale(line.style.point_size);
    let bounding_box = font
        .face()
        .glyph_bounding_box(font.glyph_id('I'))
        .unwrap();

    let center_x = (f32::from(bounding_box.x_min) + f32::from(bounding_box.x_max)) / 2.0;
    let center_y = (f32::from(bounding_box.y_min) + f32::from(bounding_box.y_max)) / 2.0;
    let baseline = line.y_offset as f32 + f32::from(font_metrics.ascent) * scale;
    (
        (line.x_offset as f32 + center_x * scale) as u32,
        (baseline - center_y * scale) as u32,
    )
}

fn large_title_pipeline(font: &FontResource) -> Pipeline<'_, FontResource> {
    let configuration = Configuration::from_json(r#"{ "styleTable": { "title": 256 } }"#).unwrap();
    Pipeline::new(&configuration, font)
}

#[test]
fn fixture_metrics_are_read_from_the_font() {
    let font_metrics = fixture_font().font_metrics();
    assert_eq!(font_metrics.units_per_em, 2048);
    assert_eq!(font_metrics.ascent, 1901);
    assert_eq!(font_metrics.descent, -483);
}

#[test]
fn lines_are_measured_with_the_glyph_advances() {
    let font = fixture_font();
    // One pixel per font unit at 2048 points
    assert_eq!(font.measure("I", 2048), (604, 2384));
    assert_eq!(font.measure("HI", 2048), (1540 + 604, 2384));
    assert_eq!(font.measure("A    B", 2048), (1401 + 4 * 651 + 1405, 2384));
    assert_eq!(font.measure("I", 1024), (302, 1192));
    assert_eq!(font.measure("", 1024), (0, 1192));
}

#[test]
fn fonts_without_color_tables_give_an_empty_map() {
    let color_map = build_color_map(&fixture_font());
    assert!(color_map.is_empty());
    assert_eq!(color_map.fill('I'), DEFAULT_FILL);
}

#[test]
fn color_glyphs_take_the_color_of_their_first_layer() {
    let color_map = build_color_map(&color_fixture_font());

    assert_eq!(color_map.iter().collect::<Vec<_>>(), vec![('I', Rgba([255, 0, 0, 255]))]);
    assert_eq!(color_map.get('B'), None);
    assert_eq!(color_map.get('C'), None);
    assert_eq!(color_map.fill('A'), DEFAULT_FILL);
}

#[test]
fn letters_are_inked_inside_their_line_box() {
    let font = fixture_font();
    let plan = large_title_pipeline(&font)
        .run(Dialect::Inline, "Title:I", None)
        .unwrap();
    // 604 and 2384 font units at a scale of 1/8, rounded up
    assert_eq!((plan.canvas_width, plan.canvas_height), (10 + 76 + 10, 10 + 298 + 10 + 10));

    let canvas = RasterRenderer::new(font.clone())
        .render(&plan, &build_color_map(&font))
        .unwrap();
    assert_eq!(canvas.dimensions(), (plan.canvas_width, plan.canvas_height));

    let (stem_x, stem_y) = stem_center(&font, &plan);
    assert_eq!(*canvas.get_pixel(stem_x, stem_y), DEFAULT_FILL);
    // Left of the stem, above the cap height and inside the margins nothing is drawn
    assert_eq!(*canvas.get_pixel(stem_x - 20, stem_y), BACKGROUND);
    assert_eq!(*canvas.get_pixel(stem_x, 20), BACKGROUND);
    assert_eq!(*canvas.get_pixel(2, 2), BACKGROUND);
    assert_eq!(
        *canvas.get_pixel(plan.canvas_width - 1, plan.canvas_height - 1),
        BACKGROUND
    );
}

#[test]
fn letters_are_filled_with_their_palette_color() {
    let font = color_fixture_font();
    let plan = large_title_pipeline(&font)
        .run(Dialect::Inline, "Title:I", None)
        .unwrap();
    let canvas = RasterRenderer::new(font.clone())
        .render(&plan, &build_color_map(&font))
        .unwrap();

    let (stem_x, stem_y) = stem_center(&font, &plan);
    assert_eq!(*canvas.get_pixel(stem_x, stem_y), Rgba([255, 0, 0, 255]));
}

#[test]
fn rendered_canvases_are_saved_as_png() {
    let font = fixture_font();
    let plan = Pipeline::new(&Configuration::default(), &font)
        .run(Dialect::Html, "<h1>Hi</h1><p>There</p>", None)
        .unwrap();
    let canvas = RasterRenderer::new(font.clone())
        .render(&plan, &build_color_map(&font))
        .unwrap();
    assert!(canvas.pixels().any(|pixel| *pixel == DEFAULT_FILL));

    let output_path =
        std::env::temp_dir().join(format!("lettering-{}-canvas.png", std::process::id()));
    save_png(&canvas, &output_path).unwrap();
    let saved_canvas = image::open(&output_path).unwrap().to_rgba8();
    std::fs::remove_file(&output_path).unwrap();

    assert_eq!(saved_canvas, canvas);
}

#[test]
fn empty_canvases_cannot_be_rendered() {
    let plan = LayoutPlan {
        canvas_width: 0,
        canvas_height: 0,
        lines: Vec::new(),
    };
    let error = RasterRenderer::new(fixture_font())
        .render(&plan, &Default::default())
        .unwrap_err();
    assert_eq!(error.kind, ErrorKind::Render);
}

#[test]
fn saving_into_a_missing_directory_fails() {
    let canvas = image::RgbaImage::from_pixel(1, 1, BACKGROUND);
    let error = save_png(&canvas, Path::new("/this/directory/does/not/exist/canvas.png")).unwrap_err();
    assert_eq!(error.kind, ErrorKind::Render);
}
