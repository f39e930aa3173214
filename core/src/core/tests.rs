use super::*;
use crate::clipboard::MemoryClipboard;
use std::time::Duration;
use tempfile::TempDir;

mod common {
    use super::*;

    pub(super) fn create_test_core() -> (GrbCore, MemoryClipboard, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        let core = GrbCore::with_clipboard(Config::new(temp_dir.path()), clipboard.clone()).unwrap();

        (core, clipboard, temp_dir)
    }

    pub(super) fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }
}

mod save {
    use super::common::{at, create_test_core};
    use super::*;

    #[test]
    fn test_save_assigns_first_id_and_writes_clipboard() {
        let (mut core, clipboard, _temp) = create_test_core();

        let snippet = core.save("buy milk", "errand", "milk", at(100)).unwrap();

        assert_eq!(snippet.id, SnippetId::FIRST);
        assert!(!snippet.pinned);
        assert_eq!(snippet.use_count, 0);
        assert_eq!(snippet.updated_at, at(100));
        assert_eq!(clipboard.text(), "buy milk");
    }

    #[test]
    fn test_save_then_lookup_round_trips_fields() {
        let (mut core, _clipboard, _temp) = create_test_core();
        let text = "a|b|c\nline two\twith tab";

        let saved = core.save(text, "t|g", "al|ias", at(5)).unwrap();
        let found = core.lookup(&saved.id.to_string()).unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.text, text);
        assert_eq!(found.tag, "t|g");
        assert_eq!(found.alias, "al|ias");
    }

    #[test]
    fn test_save_fails_and_consumes_nothing_when_clipboard_unavailable() {
        let (mut core, clipboard, _temp) = create_test_core();
        clipboard.set_unavailable(true);

        let err = core.save("x", "", "", at(1)).unwrap_err();

        assert!(matches!(err, GrbError::Clipboard(_)));
        assert_eq!(core.count().unwrap(), 0);
        assert_eq!(core.next_id().unwrap(), SnippetId::FIRST);
    }

    #[test]
    fn test_capture_leaves_clipboard_alone() {
        let (mut core, clipboard, _temp) = create_test_core();
        clipboard.set_text("already here");
        clipboard.set_unavailable(true);

        let snippet = core.capture("already here", "auto", "", at(1)).unwrap();

        assert_eq!(snippet.tag, "auto");
        clipboard.set_unavailable(false);
        assert_eq!(clipboard.text(), "already here");
        assert_eq!(core.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_increase_and_are_not_reused() {
        let (mut core, _clipboard, _temp) = create_test_core();

        let first = core.save("one", "", "", at(1)).unwrap();
        let second = core.save("two", "", "", at(2)).unwrap();
        core.delete(&first.id.to_string()).unwrap();
        core.delete(&second.id.to_string()).unwrap();
        let third = core.save("three", "", "", at(3)).unwrap();

        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);
        assert_eq!(third.id.get(), 3);
    }
}

mod lookup {
    use super::common::{at, create_test_core};

    #[test]
    fn test_lookup_missing_is_not_found() {
        let (core, _clipboard, _temp) = create_test_core();

        let err = core.lookup("ghost").unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.is_storage_unavailable());
    }

    #[test]
    fn test_lookup_by_alias() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("hello", "", "greet", at(1)).unwrap();

        assert_eq!(core.lookup("greet").unwrap().text, "hello");
    }
}

mod copy {
    use super::common::{at, create_test_core};

    #[test]
    fn test_copy_increments_use_count_and_writes_clipboard() {
        let (mut core, clipboard, _temp) = create_test_core();
        core.save("buy milk", "errand", "milk", at(1)).unwrap();
        clipboard.set_text("something else");

        let first = core.copy("milk", at(10)).unwrap();
        let second = core.copy("milk", at(20)).unwrap();

        assert_eq!(clipboard.text(), "buy milk");
        assert_eq!(first.use_count, 1);
        assert_eq!(second.use_count, 2);
        assert_eq!(second.updated_at, at(20));
        assert_eq!(core.lookup("milk").unwrap(), second);
    }

    #[test]
    fn test_copy_missing_writes_nothing() {
        let (mut core, clipboard, _temp) = create_test_core();
        clipboard.set_text("untouched");

        let err = core.copy("nope", at(1)).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(clipboard.text(), "untouched");
    }

    #[test]
    fn test_copy_with_broken_clipboard_keeps_count() {
        let (mut core, clipboard, _temp) = create_test_core();
        core.save("x", "", "a", at(1)).unwrap();
        clipboard.set_unavailable(true);

        assert!(core.copy("a", at(2)).is_err());

        let snippet = core.lookup("a").unwrap();
        assert_eq!(snippet.use_count, 0);
        assert_eq!(snippet.updated_at, at(1));
    }
}

mod pin {
    use super::common::{at, create_test_core};
    use super::*;

    #[test]
    fn test_pin_toggles() {
        let (mut core, _clipboard, _temp) = create_test_core();
        let saved = core.save("x", "t", "a", at(1)).unwrap();

        let pinned = core.pin("a", at(2)).unwrap();
        assert!(pinned.pinned);
        assert_eq!(pinned.updated_at, at(2));

        let unpinned = core.pin("a", at(3)).unwrap();
        assert!(!unpinned.pinned);
        assert_eq!(
            Snippet {
                updated_at: saved.updated_at,
                ..unpinned
            },
            saved
        );
    }

    #[test]
    fn test_pinned_snippets_list_first() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("one", "", "", at(1)).unwrap();
        core.save("two", "", "", at(2)).unwrap();
        core.pin("2", at(3)).unwrap();

        let listing = core.list().unwrap();

        assert_eq!(listing.ids(), vec![SnippetId::new(2), SnippetId::new(1)]);
    }
}

mod rename {
    use super::common::{at, create_test_core};

    #[test]
    fn test_rename_changes_only_alias() {
        let (mut core, _clipboard, _temp) = create_test_core();
        let saved = core.save("x", "t", "old", at(1)).unwrap();

        let renamed = core.rename("old", "new").unwrap();

        assert_eq!(renamed.alias, "new");
        assert_eq!(renamed.updated_at, saved.updated_at);
        assert!(core.lookup("old").unwrap_err().is_not_found());
        assert_eq!(core.lookup("new").unwrap().id, saved.id);
    }

    #[test]
    fn test_rename_allows_duplicate_alias() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("first", "", "dup", at(1)).unwrap();
        core.save("second", "", "other", at(2)).unwrap();

        core.rename("other", "dup").unwrap();

        assert_eq!(core.lookup("dup").unwrap().text, "first");
    }
}

mod edit {
    use super::common::{at, create_test_core};

    #[test]
    fn test_edit_replaces_text_and_timestamp_only() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("draft", "t", "a", at(1)).unwrap();
        core.copy("a", at(2)).unwrap();

        let draft = core.begin_edit("a").unwrap();
        assert_eq!(draft.text, "draft");

        let edited = core.commit_edit(&draft, "final", at(3)).unwrap();

        assert_eq!(edited.text, "final");
        assert_eq!(edited.tag, "t");
        assert_eq!(edited.alias, "a");
        assert_eq!(edited.use_count, 1);
        assert_eq!(edited.updated_at, at(3));
    }

    #[test]
    fn test_commit_edit_after_delete_is_not_found() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("x", "", "", at(1)).unwrap();
        let draft = core.begin_edit("1").unwrap();
        core.delete("1").unwrap();

        let err = core.commit_edit(&draft, "y", at(2)).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(core.count().unwrap(), 0);
    }
}

mod delete {
    use super::common::{at, create_test_core};

    #[test]
    fn test_delete_returns_removed_snippet() {
        let (mut core, _clipboard, _temp) = create_test_core();
        let saved = core.save("x", "", "gone", at(1)).unwrap();

        let removed = core.delete("gone").unwrap();

        assert_eq!(removed, saved);
        assert!(core.lookup("1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (mut core, _clipboard, _temp) = create_test_core();

        assert!(core.delete("1").unwrap_err().is_not_found());
    }
}

mod clear {
    use super::common::{at, create_test_core};
    use super::*;

    fn seed(core: &mut GrbCore) {
        core.save("a", "x", "", at(1)).unwrap();
        core.save("b", "y", "", at(2)).unwrap();
        core.save("c", "x", "", at(3)).unwrap();
        core.save("d", "", "", at(4)).unwrap();
        core.pin("2", at(5)).unwrap();
    }

    #[test]
    fn test_clear_by_tag_removes_exactly_that_tag() {
        let (mut core, _clipboard, _temp) = create_test_core();
        seed(&mut core);
        let before = core.list().unwrap();

        let removed = core.clear(&ClearFilter::ByTag("x".to_string())).unwrap();

        assert_eq!(removed, 2);
        let after = core.list().unwrap();
        let expected: Vec<Snippet> = before.into_iter().filter(|s| s.tag != "x").collect();
        assert_eq!(after.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_clear_by_empty_tag_removes_nothing() {
        let (mut core, _clipboard, _temp) = create_test_core();
        seed(&mut core);

        let removed = core.clear(&ClearFilter::ByTag(String::new())).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(core.count().unwrap(), 4);
    }

    #[test]
    fn test_clear_unpinned_keeps_pinned() {
        let (mut core, _clipboard, _temp) = create_test_core();
        seed(&mut core);

        let removed = core.clear(&ClearFilter::UnpinnedOnly).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(core.list().unwrap().ids(), vec![SnippetId::new(2)]);
    }

    #[test]
    fn test_clear_all() {
        let (mut core, _clipboard, _temp) = create_test_core();
        seed(&mut core);

        assert_eq!(core.clear(&ClearFilter::All).unwrap(), 4);
        assert_eq!(core.count().unwrap(), 0);
        assert_eq!(core.clear(&ClearFilter::All).unwrap(), 0);
    }
}

mod stats {
    use super::common::{at, create_test_core};
    use super::*;

    #[test]
    fn test_stats_through_core() {
        let (mut core, _clipboard, _temp) = create_test_core();
        core.save("a", "work", "", at(1)).unwrap();
        core.save("b", "work", "", at(2)).unwrap();
        core.save("c", "", "", at(3)).unwrap();
        core.copy("3", at(4)).unwrap();

        let stats = core.stats().unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.top_tag, Some(("work".to_string(), 2)));
        assert_eq!(stats.most_used.map(|s| s.id), Some(SnippetId::new(3)));
    }
}

mod open {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_under_regular_file_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::File::create(&blocker)
            .unwrap()
            .write_all(b"x")
            .unwrap();

        let result = GrbCore::with_clipboard(Config::new(blocker.join("data")), MemoryClipboard::new());

        let err = result.err().unwrap();
        assert!(err.is_storage_unavailable());
    }

    #[test]
    fn test_reopen_sees_previous_snippets() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(temp_dir.path());
        {
            let mut core = GrbCore::with_clipboard(config.clone(), MemoryClipboard::new()).unwrap();
            core.save("kept", "", "k", SystemTime::UNIX_EPOCH).unwrap();
        }

        let core = GrbCore::with_clipboard(config, MemoryClipboard::new()).unwrap();

        assert_eq!(core.lookup("k").unwrap().text, "kept");
        assert_eq!(core.next_id().unwrap().get(), 2);
    }
}
