use crate::implementations::file_tree::LocalFileTree;
use crate::implementations::normalizer::normalize_tree;
use crate::traits::file_tree::FileTree;

use super::support::{ java_path, options, setup, write, BASE_PACKAGE };

#[test]
fn misplaced_tests_move_and_packages_follow_directories() {
    setup();
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let options = options(src.path(), dst.path());
    let files = LocalFileTree::new();
    let model = format!("{}.model", BASE_PACKAGE);
    let data = format!("{}.data", BASE_PACKAGE);

    write(
        &java_path(dst.path(), "main", &model, "MemberTest.java"),
        "package org.jboss.as.quickstarts.kitchensink.model;\npublic class MemberTest {}\n"
    );
    write(
        &java_path(dst.path(), "main", &data, "MemberRepository.java"),
        "package com.acme.old;\npublic interface MemberRepository {}\n"
    );
    write(&dst.path().join("src/main/resources/Stray.java"), "package nowhere;\nclass Stray {}\n");

    let report = normalize_tree(&files, &options).unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(!files.exists(&java_path(dst.path(), "main", &model, "MemberTest.java")));
    assert!(files.exists(&java_path(dst.path(), "test", &model, "MemberTest.java")));
    assert_eq!(report.repackaged.len(), 1);
    assert!(
        files
            .read(&java_path(dst.path(), "main", &data, "MemberRepository.java"))
            .unwrap()
            .starts_with("package org.jboss.as.quickstarts.kitchensink.data;")
    );
    assert_eq!(
        files.read(&dst.path().join("src/main/resources/Stray.java")).unwrap(),
        "package nowhere;\nclass Stray {}\n"
    );
    assert!(options.test_package_root().is_dir());
}

#[test]
fn second_pass_is_a_no_op() {
    setup();
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let options = options(src.path(), dst.path());
    let files = LocalFileTree::new();
    write(
        &java_path(dst.path(), "main", &format!("{}.service", BASE_PACKAGE), "MemberServiceIT.java"),
        "package other;\npublic class MemberServiceIT {}\n"
    );

    let first = normalize_tree(&files, &options).unwrap();
    let second = normalize_tree(&files, &options).unwrap();

    assert!(!first.is_clean());
    assert!(second.is_clean());
}

#[test]
fn misplaced_test_replaces_existing_copy_in_test_tree() {
    setup();
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let options = options(src.path(), dst.path());
    let files = LocalFileTree::new();
    let model = format!("{}.model", BASE_PACKAGE);
    let main_copy = "package org.jboss.as.quickstarts.kitchensink.model;\npublic class MemberTest {\n    void fresh() {}\n}\n";

    write(&java_path(dst.path(), "main", &model, "MemberTest.java"), main_copy);
    write(
        &java_path(dst.path(), "test", &model, "MemberTest.java"),
        "package org.jboss.as.quickstarts.kitchensink.model;\npublic class MemberTest {\n    void stale() {}\n}\n"
    );

    let report = normalize_tree(&files, &options).unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(!files.exists(&java_path(dst.path(), "main", &model, "MemberTest.java")));
    assert_eq!(files.read(&java_path(dst.path(), "test", &model, "MemberTest.java")).unwrap(), main_copy);
    assert!(normalize_tree(&files, &options).unwrap().is_clean());
}
