//! Document metadata side effects.
//!
//! On every successful route change the engine updates `document.title`
//! and named `<meta>` tags from the matched route definition. The meta
//! update is an at-most-one-per-name upsert: an existing tag is rewritten
//! in place, a missing tag is created, and nothing is ever appended twice.
//! When the current path matches no definition, prior metadata is left
//! untouched.

#[cfg(target_arch = "wasm32")]
mod backend {
	fn document() -> Option<web_sys::Document> {
		web_sys::window()?.document()
	}

	pub fn set_title(title: &str) {
		if let Some(document) = document() {
			document.set_title(title);
		}
	}

	pub fn upsert_meta(name: &str, content: &str) {
		let Some(document) = document() else {
			return;
		};

		let selector = format!("meta[name=\"{name}\"]");
		if let Ok(Some(existing)) = document.query_selector(&selector) {
			let _ = existing.set_attribute("content", content);
			return;
		}

		let Ok(tag) = document.create_element("meta") else {
			return;
		};
		let _ = tag.set_attribute("name", name);
		let _ = tag.set_attribute("content", content);
		if let Some(head) = document.head() {
			let _ = head.append_child(&tag);
		}
	}
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
	use std::cell::RefCell;

	#[derive(Default)]
	struct DocumentHead {
		title: String,
		meta: Vec<(String, String)>,
	}

	thread_local! {
		static HEAD: RefCell<DocumentHead> = RefCell::new(DocumentHead::default());
	}

	pub fn set_title(title: &str) {
		HEAD.with(|head| head.borrow_mut().title = title.to_string());
	}

	pub fn upsert_meta(name: &str, content: &str) {
		HEAD.with(|head| {
			let mut head = head.borrow_mut();
			match head.meta.iter_mut().find(|(tag, _)| tag == name) {
				Some((_, existing)) => *existing = content.to_string(),
				None => head.meta.push((name.to_string(), content.to_string())),
			}
		});
	}

	pub fn document_title() -> String {
		HEAD.with(|head| head.borrow().title.clone())
	}

	pub fn meta_content(name: &str) -> Option<String> {
		HEAD.with(|head| {
			head.borrow()
				.meta
				.iter()
				.find(|(tag, _)| tag == name)
				.map(|(_, content)| content.clone())
		})
	}

	pub fn meta_count() -> usize {
		HEAD.with(|head| head.borrow().meta.len())
	}

	pub fn reset() {
		HEAD.with(|head| *head.borrow_mut() = DocumentHead::default());
	}
}

/// Sets the document title.
pub fn set_title(title: &str) {
	backend::set_title(title);
}

/// Creates or updates the `<meta name="...">` tag with the given content.
pub fn upsert_meta(name: &str, content: &str) {
	backend::upsert_meta(name, content);
}

/// The current document title held by the in-memory head.
#[cfg(not(target_arch = "wasm32"))]
pub fn document_title() -> String {
	backend::document_title()
}

/// The content of a named meta tag held by the in-memory head.
#[cfg(not(target_arch = "wasm32"))]
pub fn meta_content(name: &str) -> Option<String> {
	backend::meta_content(name)
}

/// Number of meta tags held by the in-memory head.
#[cfg(not(target_arch = "wasm32"))]
pub fn meta_count() -> usize {
	backend::meta_count()
}

/// Clears the in-memory head. Test-only.
#[cfg(not(target_arch = "wasm32"))]
pub fn reset() {
	backend::reset();
}
