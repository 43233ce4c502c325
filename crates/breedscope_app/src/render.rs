use breedscope_core::{AppViewModel, Stage};

/// One-line summary of where the pipeline is for the current picture.
pub fn status_line(view: &AppViewModel) -> String {
    let source = view
        .source
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    match view.stage {
        Stage::Idle => format!("idle, {}", catalog_summary(view)),
        Stage::PictureLoading => format!("{source}: reading picture"),
        Stage::PictureReady if view.breeds_error.is_some() => {
            format!("{source}: picture ready, breed list unavailable")
        }
        Stage::PictureReady => format!("{source}: picture ready, {}", catalog_summary(view)),
        Stage::Classifying => format!("{source}: identifying breed"),
        Stage::ResultsReady => {
            let breed = view
                .breed
                .as_ref()
                .map(|breed| breed.to_string())
                .unwrap_or_default();
            let confidence = view.confidence.unwrap_or_default() * 100.0;
            format!(
                "{source}: {breed} ({confidence:.0}%), {} picture(s)",
                view.images.len()
            )
        }
        Stage::PictureFailed | Stage::ClassificationFailed => format!(
            "{source}: failed: {}",
            view.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn catalog_summary(view: &AppViewModel) -> String {
    if view.breeds_loading {
        "loading breed list".to_string()
    } else if let Some(error) = &view.breeds_error {
        error.clone()
    } else {
        format!("{} breeds known", view.breed_count)
    }
}
