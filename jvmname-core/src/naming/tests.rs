//! Tests for JVM class naming

#[cfg(test)]
mod naming_tests {
    use crate::builder::{BuiltTree, TreeBuilder};
    use crate::error::NamingError;
    use crate::naming::{jvm_class_name, resolve_all};
    use crate::tree::{NodeId, NodeKind};

    fn name_of(built: &BuiltTree, label: &str) -> String {
        let node = built
            .node(label)
            .unwrap_or_else(|| panic!("no node labeled {}", label));
        jvm_class_name(&built.tree, node).unwrap_or_else(|e| panic!("{}: {}", label, e))
    }

    fn assert_expectations(built: &BuiltTree) {
        for (label, labeled) in &built.labels {
            if let Some(expected) = &labeled.expected {
                assert_eq!(&name_of(built, label), expected, "label {}", label);
            }
        }
    }

    fn task1_tree() -> BuiltTree {
        TreeBuilder::file("test.kt", |f| {
            f.package("org.example", |p| {
                p.class("Task1", |c| {
                    c.expect("topLevelClass", "org/example/Task1");
                    c.class("A", |a| {
                        a.expect("nested", "org/example/Task1$A");
                        a.function("solution", |s| {
                            s.expect("member", "org/example/Task1$A");
                            s.function("local", |l| {
                                l.expect("localInNested", "org/example/Task1$A$1");
                                l.lambda(|lam| {
                                    lam.expect("lambdaInLocalInNested1", "org/example/Task1$A$2");
                                    lam.function("more_local", |m| {
                                        m.expect("localInLambdaInLocalInNested", "org/example/Task1$A$3");
                                    });
                                });
                                l.lambda(|lam| {
                                    lam.expect("lambdaInLocalInNested2", "org/example/Task1$A$4");
                                });
                            });
                        });
                        a.function("util", |u| {
                            u.expect("util", "org/example/Task1$A");
                            u.lambda(|lam| {
                                lam.expect("lambdaInMemberInNested", "org/example/Task1$A$5");
                            });
                        });
                    });
                    c.function("member", |m| {
                        m.expect("memberOfTopLevel", "org/example/Task1");
                        m.function("local_in_member", |l| {
                            l.expect("localInMember", "org/example/Task1$6");
                        });
                    });
                });
                p.function("top_level", |t| {
                    t.expect("topLevelFunction", "org/example/test_kt");
                    t.lambda(|lam| {
                        lam.expect("lambdaOut1", "org/example/test_kt$1");
                    });
                });
            });
        })
        .build()
        .unwrap()
    }

    #[test]
    fn test_end_to_end_package_scenario() {
        let built = task1_tree();
        assert_eq!(built.labels.len(), 13);
        assert_expectations(&built);
    }

    #[test]
    fn test_simple_and_inner_class_names() {
        let built = TreeBuilder::file("test.kt", |f| {
            f.package("test.unit", |p| {
                p.class("TestCase", |c| {
                    c.expect("simpleClassName", "test/unit/TestCase");
                    c.class("Assert", |a| {
                        a.expect("innerClassName", "test/unit/TestCase$Assert");
                    });
                });
                p.class("Other", |_| {});
            });
        })
        .build()
        .unwrap();

        assert_expectations(&built);
    }

    #[test]
    fn test_no_package_scenario() {
        let built = TreeBuilder::file("test.kt", |f| {
            f.function("F1", |f1| {
                f1.expect("F1", "test_kt");
                f1.lambda(|l| {
                    l.expect("F1_lambda", "test_kt$1");
                    l.lambda(|inner| {
                        inner.expect("F1_lambda_lambda", "test_kt$2");
                    });
                });
                f1.function("F1_local", |local| {
                    local.expect("F1_local", "test_kt$3");
                    local.lambda(|inner| {
                        inner.expect("F1_local_lambda", "test_kt$4");
                    });
                });
            });
            f.class("C1", |c| {
                c.expect("C1", "C1");
                c.function("F2", |f2| {
                    f2.expect("F2", "C1");
                    f2.lambda(|l| {
                        l.expect("F2_lambda", "C1$1");
                    });
                    f2.function("F3", |f3| {
                        f3.expect("F3", "C1$2");
                    });
                });
            });
        })
        .build()
        .unwrap();

        assert_expectations(&built);
    }

    #[test]
    fn test_top_level_functions_share_file_counter() {
        let built = TreeBuilder::file("Util.kt", |f| {
            f.package("a.b", |p| {
                p.function("first", |func| {
                    func.lambda(|l| {
                        l.expect("l1", "a/b/Util_kt$1");
                    });
                });
                p.class("Between", |c| {
                    c.function("m", |m| {
                        m.lambda(|l| {
                            l.expect("class_lambda", "a/b/Between$1");
                        });
                    });
                });
                p.function("second", |func| {
                    func.expect("second", "a/b/Util_kt");
                    func.lambda(|l| {
                        l.expect("l2", "a/b/Util_kt$2");
                    });
                });
            });
        })
        .build()
        .unwrap();

        assert_expectations(&built);
    }

    #[test]
    fn test_top_level_classes_number_independently() {
        let build = |extra_lambdas: usize| {
            TreeBuilder::file("test.kt", |f| {
                f.class("First", |c| {
                    c.function("m", |m| {
                        for _ in 0..extra_lambdas {
                            m.lambda(|_| {});
                        }
                    });
                });
                f.class("Second", |c| {
                    c.function("m", |m| {
                        m.lambda(|_| {});
                        m.lambda(|l| {
                            l.store("target");
                        });
                    });
                });
            })
            .build()
            .unwrap()
        };

        for extra in [0, 1, 5] {
            assert_eq!(name_of(&build(extra), "target"), "Second$2");
        }
    }

    #[test]
    fn test_file_name_dots_and_dollars_become_underscores() {
        let built = TreeBuilder::file("my.script$v2.kts", |f| {
            f.function("run", |r| {
                r.store("run");
            });
        })
        .build()
        .unwrap();

        assert_eq!(name_of(&built, "run"), "my_script_v2_kts");
    }

    #[test]
    fn test_nested_class_chain() {
        let built = TreeBuilder::file("test.kt", |f| {
            f.package("p", |p| {
                p.class("A", |a| {
                    a.class("B", |b| {
                        b.class("C", |c| {
                            c.store("c");
                            c.function("f", |func| {
                                func.store("f");
                            });
                        });
                    });
                });
            });
        })
        .build()
        .unwrap();

        assert_eq!(name_of(&built, "c"), "p/A$B$C");
        assert_eq!(name_of(&built, "f"), "p/A$B$C");
    }

    #[test]
    fn test_class_scope_indices_are_contiguous() {
        let built = task1_tree();
        let tree = &built.tree;

        let mut indices: Vec<usize> = tree
            .iter()
            .filter(|n| tree.is_synthetic(n.id))
            .filter_map(|n| {
                let name = jvm_class_name(tree, n.id).ok()?;
                if name.starts_with("org/example/Task1") {
                    name.rsplit('$').next()?.parse().ok()
                } else {
                    None
                }
            })
            .collect();
        indices.sort_unstable();

        assert_eq!(indices, (1..=6).collect::<Vec<_>>());
    }

    #[test]
    fn test_file_and_package_are_invalid() {
        let built = task1_tree();
        let tree = &built.tree;

        assert_eq!(
            jvm_class_name(tree, tree.root()),
            Err(NamingError::InvalidNodeKind {
                node: NodeId(0),
                kind: NodeKind::File
            })
        );
        assert_eq!(
            jvm_class_name(tree, NodeId(1)),
            Err(NamingError::InvalidNodeKind {
                node: NodeId(1),
                kind: NodeKind::Package
            })
        );
    }

    #[test]
    fn test_unknown_node_is_malformed() {
        let built = task1_tree();
        let missing = NodeId(built.tree.len());

        assert!(matches!(
            jvm_class_name(&built.tree, missing),
            Err(NamingError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_class_root_is_malformed() {
        let mut root = crate::builder::NodeBuilder::new(NodeKind::Class, Some("Orphan".to_string()));
        root.store("orphan");
        let built = root.build().unwrap();

        assert_eq!(
            jvm_class_name(&built.tree, built.tree.root()),
            Err(NamingError::MalformedTree {
                node: NodeId(0),
                reason: "node has no parent"
            })
        );
    }

    #[test]
    fn test_lambda_without_scope_is_malformed() {
        let mut root = crate::builder::NodeBuilder::new(NodeKind::File, Some("bad.kt".to_string()));
        root.lambda(|l| {
            l.store("stray");
        });
        let built = root.build().unwrap();

        assert!(matches!(
            jvm_class_name(&built.tree, built.node("stray").unwrap()),
            Err(NamingError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_unnamed_class_is_malformed() {
        let built = TreeBuilder::file("test.kt", |f| {
            f.node(NodeKind::Class, None, |c| {
                c.store("anon_class");
            });
        })
        .build()
        .unwrap();

        assert_eq!(
            jvm_class_name(&built.tree, built.node("anon_class").unwrap()),
            Err(NamingError::MalformedTree {
                node: NodeId(1),
                reason: "declaration has no name"
            })
        );
    }

    #[test]
    fn test_unnamed_package_is_malformed() {
        let built = TreeBuilder::file("test.kt", |f| {
            f.node(NodeKind::Package, None, |p| {
                p.class("C", |c| {
                    c.store("class");
                });
                p.function("top", |t| {
                    t.store("top");
                });
            });
        })
        .build()
        .unwrap();

        for label in ["class", "top"] {
            assert_eq!(
                jvm_class_name(&built.tree, built.node(label).unwrap()),
                Err(NamingError::MalformedTree {
                    node: NodeId(1),
                    reason: "package has no name"
                }),
                "label {}",
                label
            );
        }
    }

    #[test]
    fn test_function_roles_follow_tree_predicates() {
        let built = task1_tree();
        let tree = &built.tree;

        for node in tree.iter().filter(|n| n.kind == NodeKind::Function) {
            let name = jvm_class_name(tree, node.id).unwrap();
            let parent = tree.parent(node.id).unwrap();
            if tree.is_member_function(node.id) {
                assert_eq!(name, jvm_class_name(tree, parent).unwrap());
            } else if tree.is_local_function(node.id) {
                assert!(name.rsplit('$').next().unwrap().parse::<usize>().is_ok(), "{}", name);
            } else {
                assert!(tree.is_top_level_function(node.id));
                assert_eq!(name, "org/example/test_kt");
            }
        }
    }

    #[test]
    fn test_resolve_all_skips_file_and_package() {
        let built = task1_tree();
        let all = resolve_all(&built.tree);

        assert_eq!(all.len(), built.tree.len() - 2);
        assert!(all.iter().all(|(_, result)| result.is_ok()));
        assert_eq!(all[0], (NodeId(2), Ok("org/example/Task1".to_string())));
    }

    #[test]
    fn test_concurrent_reads_agree() {
        let built = task1_tree();
        let expected = resolve_all(&built.tree);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| resolve_all(&built.tree)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
