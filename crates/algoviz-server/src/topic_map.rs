//! Links from a problem's DSA topic to an external interactive visualization.

pub const VISUALIZATION_BASE_URL: &str = "https://www.cs.usfca.edu/~galles/visualization/";
const DEFAULT_PAGE: &str = "Algorithms.html";

/// Topic keys in lookup order. Exact matches are tried first, then the first
/// key contained in the topic wins, so more specific keys come first.
const TOPIC_PAGES: &[(&str, &str)] = &[
    ("Trie", "Trie.html"),
    ("Heaps", "Heap.html"),
    ("Heap", "Heap.html"),
    ("Hashing", "Hashing.html"),
    ("Hash Table", "Hashing.html"),
    ("AVL Trees", "AVLtree.html"),
    ("Red-Black Trees", "RedBlack.html"),
    ("Splay Trees", "SplayTree.html"),
    ("B-Trees", "BTree.html"),
    ("B+ Trees", "BPlusTree.html"),
    ("Binomial Queue", "BinomialQueue.html"),
    ("Fibonacci Heap", "FibonacciHeap.html"),
    ("Disjoint Sets", "DisjointSets.html"),
    ("Leftist Heap", "LeftistHeap.html"),
    ("Skew Heap", "SkewHeap.html"),
    ("Recursive Factorial", "RecFact.html"),
    ("Towers of Hanoi", "RecHanoi.html"),
    // keyword matches
    ("Sorting", "ComparisonSort.html"),
    ("Sort", "ComparisonSort.html"),
    ("Binary Search", "Search.html"),
    ("Search", "Search.html"),
    ("Linked List", "LinkedList.html"),
    ("Stack", "StackArray.html"),
    ("Queue", "QueueArray.html"),
    ("Graph", "Graph.html"),
    ("Tree", "BST.html"),
    ("Binary Tree", "BST.html"),
    ("Binary Search Tree", "BST.html"),
    ("Recursion", "RecFact.html"),
    ("Dynamic Programming", "DP/LCS.html"),
];

/// URL of the visualization page best matching `topic`.
pub fn visualization_url(topic: &str) -> String {
    let lower = topic.trim().to_lowercase();
    let page = TOPIC_PAGES
        .iter()
        .find(|(key, _)| key.to_lowercase() == lower)
        .or_else(|| {
            TOPIC_PAGES
                .iter()
                .find(|(key, _)| lower.contains(&key.to_lowercase()))
        })
        .map_or(DEFAULT_PAGE, |(_, page)| page);
    format!("{}{}", VISUALIZATION_BASE_URL, page)
}
